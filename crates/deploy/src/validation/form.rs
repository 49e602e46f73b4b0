//! Checks that need only the request and the catalog.

use super::issue::{IssueField, IssueKind, IssueReport};
use regex::Regex;
use shared::catalog::Catalog;
use shared::models::deploy::{DeployRequest, PortForward};
use std::collections::HashMap;
use std::sync::LazyLock;

static PORT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[1-9][0-9]*$").expect("valid regex"));
static PASSWORD_CLASS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[A-Z0-9]|[^A-Za-z0-9]").expect("valid regex"));

const MIN_PASSWORD_LEN: usize = 8;
const MAX_PORT: u32 = 65535;

pub(crate) fn check_quantities(request: &DeployRequest, report: &mut IssueReport) {
    let specs = &request.specs;
    for (field, value) in [
        (IssueField::GpuCount, specs.gpu_count),
        (IssueField::Ram, specs.ram),
        (IssueField::Vcpu, specs.vcpu),
        (IssueField::Storage, specs.storage),
    ] {
        if value < 1 {
            report.add_issue(field, IssueKind::TooSmall, "Must be at least 1");
        }
    }
}

pub(crate) fn check_catalog_choices(
    request: &DeployRequest,
    catalog: &Catalog,
    report: &mut IssueReport,
) {
    if !catalog.is_allowed_gpu(&request.specs.gpu_model) {
        report.add_issue(
            IssueField::GpuModel,
            IssueKind::Invalid,
            "Please select a GPU model",
        );
    }
    if !catalog.is_allowed_os(&request.os) {
        report.add_issue(
            IssueField::Os,
            IssueKind::Invalid,
            "Please select an operating system",
        );
    }
}

pub(crate) fn check_credentials(request: &DeployRequest, report: &mut IssueReport) {
    if let Some(password) = request.admin_password.as_deref().filter(|p| !p.is_empty()) {
        if password.chars().count() < MIN_PASSWORD_LEN {
            report.add_issue(
                IssueField::AdminPassword,
                IssueKind::TooSmall,
                format!("Must be at least {MIN_PASSWORD_LEN} characters"),
            );
        }
        if !PASSWORD_CLASS.is_match(password) {
            report.add_issue(
                IssueField::AdminPassword,
                IssueKind::Invalid,
                "Password must contain at least 1 uppercase letter, symbol, or number",
            );
        }
    }

    if request.server_name.trim().is_empty() {
        report.add_issue(
            IssueField::ServerName,
            IssueKind::Invalid,
            "Please name your server",
        );
    }
}

pub(crate) fn check_port_forwards(ports: &[PortForward], report: &mut IssueReport) {
    let mut seen: HashMap<&str, usize> = HashMap::new();
    for port in ports {
        *seen.entry(port.from.as_str()).or_default() += 1;
    }

    for (index, port) in ports.iter().enumerate() {
        if !PORT.is_match(&port.from) {
            report.add_issue(
                IssueField::PortFrom(index),
                IssueKind::Invalid,
                "Please enter a valid port",
            );
        }

        if !PORT.is_match(&port.to) {
            report.add_issue(
                IssueField::PortTo(index),
                IssueKind::Invalid,
                "Please enter a valid port",
            );
        } else if !matches!(port.to.parse::<u32>(), Ok(to) if to <= MAX_PORT) {
            report.add_issue(
                IssueField::PortTo(index),
                IssueKind::TooLarge,
                format!("Must be at most {MAX_PORT}"),
            );
        }

        if seen.get(port.from.as_str()).copied().unwrap_or(0) > 1 {
            report.add_issue(
                IssueField::PortFrom(index),
                IssueKind::Invalid,
                "Duplicate external ports not allowed",
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn issues_for(ports: &[PortForward]) -> IssueReport {
        let mut report = IssueReport::new();
        check_port_forwards(ports, &mut report);
        report
    }

    #[test]
    fn test_valid_ports_pass() {
        let report = issues_for(&[
            PortForward::new("20004", "22"),
            PortForward::new("20022", "8888"),
        ]);
        assert!(report.is_valid());
    }

    #[test]
    fn test_malformed_ports_are_rejected() {
        let report = issues_for(&[
            PortForward::new("0", "22"),
            PortForward::new("20004", "abc"),
            PortForward::new("20005", "70000"),
        ]);

        assert_eq!(report.for_field(IssueField::PortFrom(0)).count(), 1);
        assert_eq!(
            report.for_field(IssueField::PortTo(1)).next().unwrap().message,
            "Please enter a valid port"
        );
        assert_eq!(
            report.for_field(IssueField::PortTo(2)).next().unwrap().kind,
            IssueKind::TooLarge
        );
    }

    #[test]
    fn test_every_duplicate_is_flagged() {
        let report = issues_for(&[
            PortForward::new("20004", "22"),
            PortForward::new("20018", "3389"),
            PortForward::new("20004", "8888"),
        ]);

        assert_eq!(report.len(), 2);
        assert!(report
            .issues()
            .iter()
            .all(|i| i.message == "Duplicate external ports not allowed"));
        assert_eq!(report.for_field(IssueField::PortFrom(0)).count(), 1);
        assert_eq!(report.for_field(IssueField::PortFrom(2)).count(), 1);
    }
}
