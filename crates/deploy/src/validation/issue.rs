use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum Severity {
    Error,
    Fatal,
}

/// Form field an issue is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum IssueField {
    GpuModel,
    GpuCount,
    Ram,
    Vcpu,
    Storage,
    Os,
    Hostnode,
    ServerName,
    AdminPassword,
    /// External port of the port forward at this index.
    PortFrom(usize),
    /// Internal port of the port forward at this index.
    PortTo(usize),
}

impl fmt::Display for IssueField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::GpuModel => write!(f, "gpu_model"),
            Self::GpuCount => write!(f, "gpu_count"),
            Self::Ram => write!(f, "ram"),
            Self::Vcpu => write!(f, "vcpu"),
            Self::Storage => write!(f, "storage"),
            Self::Os => write!(f, "os"),
            Self::Hostnode => write!(f, "hostnode"),
            Self::ServerName => write!(f, "server_name"),
            Self::AdminPassword => write!(f, "admin_password"),
            Self::PortFrom(index) => write!(f, "port_forwards[{index}].from"),
            Self::PortTo(index) => write!(f, "port_forwards[{index}].to"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum IssueKind {
    TooSmall,
    TooLarge,
    SelectionInvalid, // host gone or GPU model missing on host
    PortUnavailable,  // external port not advertised by host
    Invalid,          // malformed form input
}

impl IssueKind {
    pub const fn severity(&self) -> Severity {
        match self {
            Self::SelectionInvalid | Self::PortUnavailable => Severity::Fatal,
            _ => Severity::Error,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Issue {
    pub field: IssueField,
    pub kind: IssueKind,
    pub message: String,
}

impl Issue {
    pub fn new(field: IssueField, kind: IssueKind, message: impl Into<String>) -> Self {
        Self {
            field,
            kind,
            message: message.into(),
        }
    }

    pub const fn severity(&self) -> Severity {
        self.kind.severity()
    }
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({:?}): {}", self.field, self.kind, self.message)
    }
}

/// Everything wrong with one deploy request. Empty means it may be submitted.
#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct IssueReport {
    issues: Vec<Issue>,
}

impl IssueReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_issue(&mut self, field: IssueField, kind: IssueKind, message: impl Into<String>) {
        self.issues.push(Issue::new(field, kind, message));
    }

    pub fn issues(&self) -> &[Issue] {
        &self.issues
    }

    pub fn for_field(&self, field: IssueField) -> impl Iterator<Item = &Issue> {
        self.issues.iter().filter(move |issue| issue.field == field)
    }

    pub fn is_valid(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn has_fatal_issues(&self) -> bool {
        self.issues
            .iter()
            .any(|issue| issue.severity() == Severity::Fatal)
    }

    pub fn len(&self) -> usize {
        self.issues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }
}

impl fmt::Display for IssueReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.issues.is_empty() {
            return write!(f, "No issues found");
        }
        // fatal issues first, then the rest in check order
        let mut first = true;
        for severity in [Severity::Fatal, Severity::Error] {
            for issue in self.issues.iter().filter(|i| i.severity() == severity) {
                if !first {
                    writeln!(f)?;
                }
                write!(f, "{issue}")?;
                first = false;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_follows_kind() {
        assert_eq!(IssueKind::PortUnavailable.severity(), Severity::Fatal);
        assert_eq!(IssueKind::SelectionInvalid.severity(), Severity::Fatal);
        assert_eq!(IssueKind::TooLarge.severity(), Severity::Error);
        assert_eq!(IssueKind::Invalid.severity(), Severity::Error);
    }

    #[test]
    fn test_report_lists_fatal_first() {
        let mut report = IssueReport::new();
        assert!(report.is_valid());
        assert_eq!(report.to_string(), "No issues found");

        report.add_issue(IssueField::Ram, IssueKind::TooSmall, "Must be at least 1");
        report.add_issue(
            IssueField::PortFrom(2),
            IssueKind::PortUnavailable,
            "Port 9999 is unavailable",
        );

        assert!(!report.is_valid());
        assert!(report.has_fatal_issues());
        assert_eq!(
            report.to_string(),
            "port_forwards[2].from (PortUnavailable): Port 9999 is unavailable\n\
             ram (TooSmall): Must be at least 1"
        );
        assert_eq!(report.for_field(IssueField::Ram).count(), 1);
    }
}
