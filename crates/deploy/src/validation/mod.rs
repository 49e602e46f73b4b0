//! Deploy request validation.
//!
//! [`validate`] never fails; it collects every problem it can find into an
//! [`IssueReport`]. Form checks run first, then the checks against the chosen
//! host in the current inventory snapshot.

mod form;
mod issue;

pub use issue::{Issue, IssueField, IssueKind, IssueReport, Severity};

use log::debug;
use shared::catalog::Catalog;
use shared::models::deploy::DeployRequest;
use shared::models::hostnode::{Bounds, HostnodeEntry, Inventory};

/// A per-host resource limit as shown to the user.
struct Resource {
    field: IssueField,
    display: &'static str,
    unit: &'static str,
}

const GPU_COUNT: Resource = Resource {
    field: IssueField::GpuCount,
    display: "GPUs",
    unit: "",
};
const VCPU: Resource = Resource {
    field: IssueField::Vcpu,
    display: "VCPUs",
    unit: "",
};
const RAM: Resource = Resource {
    field: IssueField::Ram,
    display: "RAM",
    unit: " GB",
};
const STORAGE: Resource = Resource {
    field: IssueField::Storage,
    display: "storage",
    unit: " GB",
};

pub fn validate(request: &DeployRequest, inventory: &Inventory, catalog: &Catalog) -> IssueReport {
    let mut report = IssueReport::new();

    form::check_quantities(request, &mut report);
    form::check_catalog_choices(request, catalog, &mut report);
    form::check_credentials(request, &mut report);
    form::check_port_forwards(&request.port_forwards, &mut report);

    check_os_storage(request, catalog, &mut report);
    if let Some(host) = inventory.get(&request.hostnode) {
        check_host(request, host, &mut report);
    } else {
        report.add_issue(
            IssueField::Hostnode,
            IssueKind::SelectionInvalid,
            "Please select an available location",
        );
    }

    debug!(
        "Validated deploy of {} on {}: {} issue(s)",
        request.specs,
        request.hostnode,
        report.len()
    );
    report
}

fn check_os_storage(request: &DeployRequest, catalog: &Catalog, report: &mut IssueReport) {
    let Some(min) = catalog.os(&request.os).and_then(|os| os.min_storage_gb) else {
        return;
    };
    if request.specs.storage < min {
        report.add_issue(
            IssueField::Storage,
            IssueKind::TooSmall,
            format!(
                "Please ensure you have enough storage space ({min} GB) for our {} operating system template",
                request.os
            ),
        );
    }
}

fn check_host(request: &DeployRequest, host: &HostnodeEntry, report: &mut IssueReport) {
    for (index, port) in request.port_forwards.iter().enumerate() {
        let advertised = port
            .from
            .parse::<u16>()
            .is_ok_and(|from| host.networking.ports.contains(&from));
        if !advertised {
            report.add_issue(
                IssueField::PortFrom(index),
                IssueKind::PortUnavailable,
                format!("Port {} is unavailable", port.from),
            );
        }
    }

    let specs = &request.specs;
    let Some(gpu) = host.specs.gpu.get(&specs.gpu_model) else {
        report.add_issue(
            IssueField::Hostnode,
            IssueKind::SelectionInvalid,
            "Location does not have selected GPU",
        );
        return;
    };

    check_capacity(&GPU_COUNT, specs.gpu_count, gpu.amount, report);
    check_capacity(&VCPU, specs.vcpu, host.specs.cpu.amount, report);
    check_capacity(&RAM, specs.ram, host.specs.ram.amount, report);
    check_capacity(&STORAGE, specs.storage, host.specs.storage.amount, report);

    if let Some(restriction) = host.specs.restriction_for(specs.gpu_count) {
        let gpus = specs.gpu_count;
        check_restriction(&VCPU, specs.vcpu, gpus, restriction.cpu, report);
        check_restriction(&RAM, specs.ram, gpus, restriction.ram, report);
        check_restriction(&STORAGE, specs.storage, gpus, restriction.storage, report);
    }
}

fn check_capacity(resource: &Resource, requested: u32, total: u32, report: &mut IssueReport) {
    if requested > total {
        report.add_issue(
            resource.field,
            IssueKind::TooLarge,
            format!("Too large: {total}{} available at location", resource.unit),
        );
    }
}

fn check_restriction(
    resource: &Resource,
    requested: u32,
    gpus: u32,
    bounds: Bounds,
    report: &mut IssueReport,
) {
    let plural = if gpus == 1 { "" } else { "s" };
    if requested < bounds.min {
        report.add_issue(
            resource.field,
            IssueKind::TooSmall,
            format!(
                "Not enough {} for {gpus} GPU{plural} at this location. Minimum is {}{}",
                resource.display, bounds.min, resource.unit
            ),
        );
    }
    if requested > bounds.max {
        report.add_issue(
            resource.field,
            IssueKind::TooLarge,
            format!(
                "Too large for {gpus} GPU{plural} at this location. Maximum is {}{}",
                bounds.max, resource.unit
            ),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{host, restriction, spec, H100};
    use shared::models::deploy::PortForward;

    fn request(gpu_count: u32, ram: u32) -> DeployRequest {
        DeployRequest {
            specs: spec(H100, gpu_count, ram, 16, 600),
            hostnode: "host-1".to_string(),
            os: "Ubuntu 22.04 LTS".to_string(),
            admin_password: None,
            ssh_key: Some("ssh-ed25519 AAAA".to_string()),
            server_name: "trainer".to_string(),
            port_forwards: vec![PortForward::new("20004", "22")],
            cloudinit_script: String::new(),
        }
    }

    fn inventory_with(entry: HostnodeEntry) -> Inventory {
        Inventory::from([("host-1".to_string(), entry)])
    }

    #[test]
    fn test_valid_request_has_no_issues() {
        let inventory = inventory_with(host("site-1", H100, 4, 2.0));
        let report = validate(&request(2, 128), &inventory, &Catalog::default());
        assert!(report.is_valid(), "{report}");
    }

    #[test]
    fn test_gpu_count_boundary() {
        let inventory = inventory_with(host("site-1", H100, 4, 2.0));
        let catalog = Catalog::default();

        let report = validate(&request(5, 128), &inventory, &catalog);
        let gpu_issues: Vec<_> = report.for_field(IssueField::GpuCount).collect();
        assert_eq!(gpu_issues.len(), 1);
        assert_eq!(gpu_issues[0].kind, IssueKind::TooLarge);
        assert_eq!(gpu_issues[0].message, "Too large: 4 available at location");

        let report = validate(&request(4, 128), &inventory, &catalog);
        assert_eq!(report.for_field(IssueField::GpuCount).count(), 0);
    }

    #[test]
    fn test_restriction_minimum_applies_below_capacity() {
        let mut entry = host("site-1", H100, 4, 2.0);
        entry.specs.restrictions.insert(
            "2".to_string(),
            restriction((8, 32), (64, 256), (100, 4000)),
        );
        let inventory = inventory_with(entry);

        let report = validate(&request(2, 32), &inventory, &Catalog::default());
        let ram_issues: Vec<_> = report.for_field(IssueField::Ram).collect();
        assert_eq!(ram_issues.len(), 1);
        assert_eq!(ram_issues[0].kind, IssueKind::TooSmall);
        assert_eq!(
            ram_issues[0].message,
            "Not enough RAM for 2 GPUs at this location. Minimum is 64 GB"
        );
    }

    #[test]
    fn test_capacity_and_restriction_both_fire() {
        let mut entry = host("site-1", H100, 4, 2.0);
        entry.specs.ram.amount = 200;
        entry.specs.restrictions.insert(
            "1".to_string(),
            restriction((8, 32), (16, 128), (100, 4000)),
        );
        let inventory = inventory_with(entry);

        let report = validate(&request(1, 300), &inventory, &Catalog::default());
        let messages: Vec<_> = report
            .for_field(IssueField::Ram)
            .map(|i| i.message.as_str())
            .collect();
        assert_eq!(
            messages,
            vec![
                "Too large: 200 GB available at location",
                "Too large for 1 GPU at this location. Maximum is 128 GB",
            ]
        );
    }

    #[test]
    fn test_inverted_restriction_reports_both_bounds() {
        let mut entry = host("site-1", H100, 4, 2.0);
        entry.specs.restrictions.insert(
            "2".to_string(),
            restriction((8, 32), (256, 64), (100, 4000)),
        );
        let inventory = inventory_with(entry);

        let report = validate(&request(2, 128), &inventory, &Catalog::default());
        let kinds: Vec<_> = report.for_field(IssueField::Ram).map(|i| i.kind).collect();
        assert_eq!(kinds, vec![IssueKind::TooSmall, IssueKind::TooLarge]);
    }

    #[test]
    fn test_missing_host_stops_resource_checks() {
        let inventory = inventory_with(host("site-1", H100, 1, 2.0));
        let mut req = request(8, 128);
        req.hostnode = "gone".to_string();

        let report = validate(&req, &inventory, &Catalog::default());
        assert_eq!(report.len(), 1);
        assert_eq!(report.issues()[0].kind, IssueKind::SelectionInvalid);
        assert_eq!(report.issues()[0].message, "Please select an available location");
    }

    #[test]
    fn test_missing_gpu_model_is_selection_invalid() {
        let inventory = inventory_with(host("site-1", "a100-pcie-80gb", 4, 1.5));
        let report = validate(&request(8, 2048), &inventory, &Catalog::default());

        assert_eq!(report.len(), 1);
        assert_eq!(report.issues()[0].field, IssueField::Hostnode);
        assert_eq!(report.issues()[0].message, "Location does not have selected GPU");
    }

    #[test]
    fn test_unadvertised_port_is_fatal() {
        let inventory = inventory_with(host("site-1", H100, 4, 2.0));
        let mut req = request(1, 64);
        req.port_forwards.push(PortForward::new("30000", "80"));

        let report = validate(&req, &inventory, &Catalog::default());
        assert!(report.has_fatal_issues());
        let issue = report.for_field(IssueField::PortFrom(1)).next().unwrap();
        assert_eq!(issue.kind, IssueKind::PortUnavailable);
        assert_eq!(issue.message, "Port 30000 is unavailable");
    }

    #[test]
    fn test_os_storage_minimum_runs_without_host() {
        let mut req = request(1, 64);
        req.os = "Windows 10".to_string();
        req.specs.storage = 50;
        req.hostnode = "gone".to_string();

        let report = validate(&req, &Inventory::new(), &Catalog::default());
        let storage: Vec<_> = report.for_field(IssueField::Storage).collect();
        assert_eq!(storage.len(), 1);
        assert_eq!(
            storage[0].message,
            "Please ensure you have enough storage space (90 GB) for our Windows 10 operating system template"
        );
        assert_eq!(report.for_field(IssueField::Hostnode).count(), 1);
    }

    #[test]
    fn test_form_checks_report_every_field() {
        let inventory = inventory_with(host("site-1", H100, 4, 2.0));
        let mut req = request(1, 64);
        req.specs.vcpu = 0;
        req.admin_password = Some("short".to_string());
        req.server_name = "  ".to_string();
        req.os = "Plan 9".to_string();

        let report = validate(&req, &inventory, &Catalog::default());
        let password: Vec<_> = report
            .for_field(IssueField::AdminPassword)
            .map(|i| i.message.as_str())
            .collect();
        assert_eq!(
            password,
            vec![
                "Must be at least 8 characters",
                "Password must contain at least 1 uppercase letter, symbol, or number",
            ]
        );
        assert_eq!(report.for_field(IssueField::Vcpu).count(), 1);
        assert_eq!(report.for_field(IssueField::ServerName).count(), 1);
        assert_eq!(report.for_field(IssueField::Os).count(), 1);
        assert!(!report.has_fatal_issues());
    }
}
