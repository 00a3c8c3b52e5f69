//! CSV serialization of the derived ACL.
//!
//! ```text
//! User,Resource,Decision
//! A,C,Permit
//! D,C,Deny
//! ```

use minacl_core::{ACL_HEADER, Error, MinimalAcl, Result};
use std::io::Write;
use std::path::Path;

/// Default output file name.
pub const DEFAULT_OUTPUT_FILE: &str = "min_low_level_auths.csv";

/// Writes the header and one row per rule.
pub fn write_acl<W: Write>(acl: &MinimalAcl, writer: W) -> Result<()> {
    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record(ACL_HEADER)?;
    for rule in &acl.rules {
        csv.write_record([
            rule.source.as_str(),
            rule.target.as_str(),
            rule.decision.as_str(),
        ])?;
    }
    csv.flush()?;
    Ok(())
}

/// Writes the table to a file, replacing it.
pub fn write_acl_path(acl: &MinimalAcl, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let file = std::fs::File::create(path).map_err(|e| Error::io_with_path(e, path))?;
    write_acl(acl, std::io::BufWriter::new(file))?;
    tracing::info!(
        output = %path.display(),
        permits = acl.permit_count(),
        denies = acl.deny_count(),
        "wrote minimal ACL"
    );
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use minacl_core::{AclRule, Decision, RequestKey};

    fn render(acl: &MinimalAcl) -> String {
        let mut buf = Vec::new();
        write_acl(acl, &mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_header_only() {
        assert_eq!(render(&MinimalAcl::empty()), "User,Resource,Decision\n");
    }

    #[test]
    fn test_rows() {
        let acl = MinimalAcl {
            rules: vec![
                AclRule::new(&RequestKey::new("A", "C"), Decision::Permit),
                AclRule::new(&RequestKey::new("D", "C"), Decision::Deny),
            ],
        };
        assert_eq!(
            render(&acl),
            "User,Resource,Decision\nA,C,Permit\nD,C,Deny\n"
        );
    }

    #[test]
    fn test_quotes_ids_with_commas() {
        let acl = MinimalAcl {
            rules: vec![AclRule::new(
                &RequestKey::new("user,1", "doc"),
                Decision::Permit,
            )],
        };
        assert!(render(&acl).contains("\"user,1\",doc,Permit"));
    }

    #[test]
    fn test_write_acl_path_overwrites() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join(DEFAULT_OUTPUT_FILE);
        std::fs::write(&path, "stale").unwrap();

        write_acl_path(&MinimalAcl::empty(), &path).unwrap();
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "User,Resource,Decision\n"
        );
    }

    #[test]
    fn test_write_acl_path_missing_dir() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("missing").join("out.csv");
        let err = write_acl_path(&MinimalAcl::empty(), &path).unwrap_err();
        assert!(matches!(err, Error::Io { path: Some(_), .. }));
    }
}
