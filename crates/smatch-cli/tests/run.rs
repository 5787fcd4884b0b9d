//! Integration tests for request execution over local datasets.

use std::fs;
use std::path::Path;

use anyhow::anyhow;
use smatch_catalog::DatasetSource;
use smatch_cli::config::MatchConfig;
use smatch_cli::run::{Request, error_kind, execute, exit_code, open_source};
use smatch_model::ErrorKind;
use tempfile::TempDir;

fn write(path: &Path, contents: &str) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, contents).unwrap();
}

fn datasets() -> TempDir {
    let dir = TempDir::new().unwrap();
    write(
        &dir.path().join("crm/users.csv"),
        "id,email\n1,a@x.io\n2,b@x.io\n",
    );
    write(
        &dir.path().join("crm/contacts.csv"),
        "uid,mail\n7,c@x.io\n",
    );
    write(
        &dir.path().join("shop/members.csv"),
        "uid,mail,joined\n10,d@y.io,2024-05-01\n",
    );
    write(&dir.path().join("empty/void.csv"), "");
    dir
}

#[test]
fn other_db_request_ranks_matches() {
    let dir = datasets();
    let source = DatasetSource::new(dir.path()).unwrap();
    let request = Request::OtherDb {
        table: "crm/users".into(),
        database: "shop".into(),
    };

    let ranked = execute(&source, &MatchConfig::default(), &request).unwrap();

    assert_eq!(ranked.len(), 2);
    assert!(ranked[0].sim >= ranked[1].sim);
    let mut pairs: Vec<_> = ranked
        .iter()
        .map(|m| (m.source.name.as_str(), m.target.name.as_str()))
        .collect();
    pairs.sort_unstable();
    assert_eq!(
        pairs,
        vec![("users.email", "members.mail"), ("users.id", "members.uid")]
    );
    assert_eq!(ranked[0].source.guid.split('/').next(), Some("crm"));
}

#[test]
fn within_db_request_uses_sibling_tables() {
    let dir = datasets();
    let source = DatasetSource::new(dir.path()).unwrap();
    let request = Request::WithinDb {
        table: "crm/users".into(),
    };

    let ranked = execute(&source, &MatchConfig::default(), &request).unwrap();

    assert!(!ranked.is_empty());
    assert!(ranked.iter().all(|m| m.target.name.starts_with("contacts.")));
}

#[test]
fn holistic_request_skips_empty_databases() {
    let dir = datasets();
    let source = DatasetSource::new(dir.path()).unwrap();
    let config = MatchConfig {
        max_matches: Some(3),
        ..MatchConfig::default()
    };
    let request = Request::Holistic {
        table: "crm/users".into(),
    };

    let ranked = execute(&source, &config, &request).unwrap();

    assert_eq!(ranked.len(), 3);
    assert!(ranked.windows(2).all(|w| w[0].sim >= w[1].sim));
}

#[test]
fn empty_target_database_is_a_client_error() {
    let dir = datasets();
    let source = DatasetSource::new(dir.path()).unwrap();
    let request = Request::OtherDb {
        table: "crm/users".into(),
        database: "empty".into(),
    };

    let err = execute(&source, &MatchConfig::default(), &request).unwrap_err();

    assert_eq!(error_kind(&err), Some(ErrorKind::EmptySchema));
    assert_eq!(exit_code(&err), 2);
}

#[test]
fn invalid_parameters_are_reported() {
    let dir = datasets();
    let source = DatasetSource::new(dir.path()).unwrap();
    let mut config = MatchConfig::default();
    config.cupid.th_low = 0.9;

    let err = execute(
        &source,
        &config,
        &Request::WithinDb {
            table: "crm/users".into(),
        },
    )
    .unwrap_err();

    assert_eq!(error_kind(&err), Some(ErrorKind::InvalidParameters));
}

#[test]
fn source_selection() {
    let dir = datasets();
    assert!(open_source(&MatchConfig::default(), Some(dir.path())).is_ok());
    assert!(open_source(&MatchConfig::default(), None).is_err());

    let mut config = MatchConfig::default();
    config.atlas.url = Some("http://atlas:21000".into());
    config.atlas.user = Some("admin".into());
    assert!(open_source(&config, None).is_err());
}

#[test]
fn unknown_errors_exit_with_one() {
    let err = anyhow!("boom");
    assert_eq!(error_kind(&err), None);
    assert_eq!(exit_code(&err), 1);
}
