//! CSV output formatting for the assessment.

use super::terminal::format_field;
use crate::engine::{AssessmentResult, RiskLevel};
use std::error::Error;
use std::io::Write;

fn risk_str(risk: RiskLevel) -> &'static str {
    match risk {
        RiskLevel::None => "none",
        RiskLevel::Low => "low",
        RiskLevel::Medium => "medium",
        RiskLevel::High => "high",
    }
}

/// Write the per-subnet assessment as CSV.
///
/// One row per subnet, with its VNet readiness and warnings repeated on
/// each row so the file filters cleanly in a spreadsheet.
pub fn write_assessment_csv<W: Write>(
    result: &AssessmentResult,
    out: &mut W,
) -> Result<(), Box<dyn Error>> {
    writeln!(
        out,
        r#""subscription_name","vnet_name","vnet_readiness","redundancy_warning","overlap_partners","subnet_name","subnet_cidr","classification","risk","workloads","workloads_public_ip""#
    )?;

    for sub in &result.subscriptions {
        for vnet in &sub.vnets {
            for subnet in &vnet.subnets {
                writeln!(
                    out,
                    "{subscription},{vnet},{readiness},{warning},{overlaps},{subnet},{cidr},{classification},{risk},{workloads},{public}",
                    subscription = format_field(&sub.display_name, 24),
                    vnet = format_field(&vnet.name, 24),
                    readiness = format_field(vnet.readiness.label(), 17),
                    warning = format_field(vnet.insufficient_route_table_redundancy, 7),
                    overlaps = format_field(vnet.overlap_partners.join(";"), 10),
                    subnet = format_field(&subnet.name, 24),
                    cidr = format_field(&subnet.address_prefix, 18),
                    classification = format_field(subnet.classification.label(), 26),
                    risk = format_field(risk_str(subnet.risk), 8),
                    workloads = format_field(subnet.workload_count, 4),
                    public = format_field(subnet.workloads_with_public_ip, 4),
                )?;
            }
        }
    }

    Ok(())
}

/// Write the CSV to a file and log the destination.
pub fn export_csv(result: &AssessmentResult, path: &str) -> Result<(), Box<dyn Error>> {
    let mut buffer = Vec::new();
    write_assessment_csv(result, &mut buffer)?;
    std::fs::write(path, &buffer).map_err(|e| format!("Error writing CSV file {path}: {e}"))?;
    log::info!("Wrote CSV report to {path}");
    Ok(())
}
