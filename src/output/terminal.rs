//! Terminal output for the assessment.
//!
//! Prints per-subscription and overall summaries with colored
//! classification lines. Reads the assessment result only; nothing here
//! feeds back into the engine.

use crate::engine::{AssessmentResult, RiskLevel, SubnetClassification, VnetReadiness};
use colored::Colorize;

/// Format a value as a quoted, right-aligned field.
pub fn format_field<T: ToString>(value: T, width: usize) -> String {
    let value_str = value.to_string();
    let quoted = format!("\"{value_str}\"");
    let quoted_len = quoted.len();

    if quoted_len >= width {
        quoted
    } else {
        format!("{quoted:>width$}")
    }
}

fn colorize_classification(classification: SubnetClassification) -> colored::ColoredString {
    match classification.risk() {
        RiskLevel::None => classification.label().green(),
        RiskLevel::Low => classification.label().cyan(),
        RiskLevel::Medium => classification.label().yellow(),
        RiskLevel::High => classification.label().red(),
    }
}

fn colorize_readiness(readiness: VnetReadiness) -> colored::ColoredString {
    match readiness {
        VnetReadiness::ReadySecure => readiness.label().green(),
        VnetReadiness::ReadyInsecure => readiness.label().yellow(),
        VnetReadiness::NotReady => readiness.label().red(),
    }
}

/// Print the full assessment to stdout.
pub fn print_assessment(result: &AssessmentResult) {
    for sub in &result.subscriptions {
        println!(
            "\n{}",
            format!("Subscription: {} ({})", sub.display_name, sub.id).bold()
        );

        for vnet in &sub.vnets {
            println!(
                "  VNET: '{}' - {} ({} subnets)",
                vnet.name,
                colorize_readiness(vnet.readiness),
                vnet.subnets.len()
            );

            if vnet.insufficient_route_table_redundancy {
                println!(
                    "    {}: insufficient route tables for NVA redundancy",
                    "warning".on_yellow()
                );
            }
            if !vnet.overlap_partners.is_empty() {
                println!(
                    "    {}: address space overlaps {}",
                    "warning".on_yellow(),
                    vnet.overlap_partners.join(", ")
                );
            }

            for subnet in &vnet.subnets {
                println!(
                    "    Subnet: {} [{}] - {} ({} workloads, {} public)",
                    subnet.name,
                    subnet.address_prefix,
                    colorize_classification(subnet.classification),
                    subnet.workload_count,
                    subnet.workloads_with_public_ip,
                );
            }
        }
    }

    print_summary(result);
}

/// Print the run-level summary block.
pub fn print_summary(result: &AssessmentResult) {
    let s = &result.summary;

    println!(
        "\n{}",
        "==================== OVERALL SUMMARY ====================".bold()
    );
    println!("Total Subscriptions: {}", s.total_subscriptions);
    println!("Total VNets: {}", s.total_vnets);
    println!("  Ready (Secure): {}", s.vnets_ready_secure);
    println!("  Ready (Insecure): {}", s.vnets_ready_insecure);
    println!("  Not Ready: {}", s.vnets_not_ready);
    println!(
        "  Redundancy warnings: {}",
        s.vnets_with_redundancy_warning
    );
    println!("Total Subnets: {}", s.total_subnets);
    println!(
        "  {}",
        format!(
            "Not Affected: {} (No Workloads: {}, Public: {}, NAT Gateway: {}, UDR: {})",
            s.subnets_no_workloads + s.subnets_public + s.subnets_nat_gateway + s.subnets_udr,
            s.subnets_no_workloads,
            s.subnets_public,
            s.subnets_nat_gateway,
            s.subnets_udr
        )
        .green()
    );
    println!(
        "  {}",
        format!("Default Egress: {}", s.subnets_default_egress).yellow()
    );
    println!(
        "  {}",
        format!("Mixed-Mode: {}", s.subnets_mixed_mode).red()
    );
    println!(
        "Affected: {} of {} subnets with workloads ({}%)",
        s.affected_subnets, s.subnets_with_workloads, s.affected_subnet_percentage
    );
    println!(
        "Workloads: {} ({} with public IP)",
        s.total_workloads, s.workloads_with_public_ip
    );
    println!("CIDR overlap pairs: {}", s.cidr_overlap_count);
}
