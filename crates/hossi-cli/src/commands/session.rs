use anyhow::Result;
use colored::Colorize;
use hossi_application::ClientContext;
use hossi_application::forms::LoginForm;
use hossi_application::navigation::NavItem;

pub async fn login(ctx: &ClientContext, username: String, password: String) -> Result<()> {
    let identity = ctx.auth().login(LoginForm::new(username, password)).await?;
    println!(
        "Logged in as {} ({})",
        identity.username.bold(),
        identity.role
    );
    Ok(())
}

pub fn logout(ctx: &ClientContext) -> Result<()> {
    ctx.auth().logout()?;
    Ok(())
}

pub fn whoami(ctx: &ClientContext) -> Result<()> {
    let Some(identity) = ctx.identity() else {
        println!("{}", "Not logged in".yellow());
        return Ok(());
    };

    println!("{} (id {})", identity.username.bold(), identity.id);
    println!("  role:   {}", identity.role);
    match identity.branch_id {
        Some(branch_id) => println!("  branch: {}", branch_id),
        None => println!("  branch: -"),
    }

    let capabilities: Vec<String> = ctx.capabilities().iter().map(|c| c.to_string()).collect();
    println!("  access: {}", capabilities.join(", "));
    Ok(())
}

pub fn nav(ctx: &ClientContext) -> Result<()> {
    let items = ctx.nav_items();
    if items.is_empty() {
        println!("{}", "Not logged in".yellow());
        return Ok(());
    }

    for item in items {
        match item {
            NavItem::Open(view) => println!("  {:<14} {}", item.label(), view.route().dimmed()),
            NavItem::Logout => println!("  {}", item.label()),
        }
    }
    Ok(())
}
