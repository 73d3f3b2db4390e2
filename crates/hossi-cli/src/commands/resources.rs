use super::output::print_json;
use anyhow::{Context, Result};
use hossi_application::ClientContext;
use hossi_application::dashboard::patients_per_branch;
use hossi_core::resource::ResourceKind;
use serde_json::Value;

pub async fn list(ctx: &ClientContext, kind: ResourceKind) -> Result<()> {
    let records = ctx.list(kind).await?;
    print_json(&records)
}

pub async fn create(ctx: &ClientContext, kind: ResourceKind, json: &str) -> Result<()> {
    let raw: Value = serde_json::from_str(json).context("--json must be a JSON object")?;
    let created = ctx.create(kind, raw).await?;
    print_json(&created)
}

pub async fn dashboard(ctx: &ClientContext) -> Result<()> {
    let patients = ctx.list(ResourceKind::Patients).await?;
    let counts = patients_per_branch(&patients);
    if counts.is_empty() {
        println!("No patients");
        return Ok(());
    }

    println!("{:<10} PATIENTS", "BRANCH");
    for count in counts {
        println!("{:<10} {}", count.branch_id, count.patients);
    }
    Ok(())
}
