use maskdrift::inventory::{
    diff, ChangeKind, ColumnRecord, ColumnRecords, ColumnSnapshot, TableSnapshot,
};

fn tables(entries: &[(i64, &str)]) -> TableSnapshot {
    entries.iter().map(|(id, name)| (*id, name.to_string())).collect()
}

fn records(cols: &[(&str, &str)]) -> ColumnRecords {
    cols.iter()
        .map(|(name, encoded)| {
            (
                name.to_string(),
                ColumnRecord::parse(encoded).expect("legacy encoding"),
            )
        })
        .collect()
}

fn columns(tables: &[(&str, &[(&str, &str)])]) -> ColumnSnapshot {
    tables
        .iter()
        .map(|(table, cols)| (table.to_string(), records(cols)))
        .collect()
}

#[test]
fn test_self_diff_is_empty() {
    let t = tables(&[(1, "accounts"), (2, "customers")]);
    let c = columns(&[
        ("accounts", &[("ssn", "varchar|11|true|SSN_MASK|true")]),
        ("customers", &[("name", "varchar|80|false||true")]),
    ]);
    assert!(diff(&t, &c, &t, &c).is_empty());
}

#[test]
fn test_old_superset_with_identical_names_yields_no_findings() {
    // Tables present only in the old snapshot are never reported.
    let old_t = tables(&[(1, "accounts"), (2, "customers"), (3, "orders")]);
    let new_t = tables(&[(1, "accounts"), (2, "customers")]);
    let old_c = columns(&[
        ("accounts", &[("ssn", "varchar|11|true|SSN_MASK|true")]),
        ("customers", &[("name", "varchar|80|false||true")]),
        ("orders", &[("total", "number|10|false||true")]),
    ]);
    let new_c = columns(&[
        ("accounts", &[("ssn", "varchar|11|true|SSN_MASK|true")]),
        ("customers", &[("name", "varchar|80|false||true")]),
    ]);
    assert!(diff(&old_t, &old_c, &new_t, &new_c).is_empty());
}

#[test]
fn test_new_table_reported_exactly_once() {
    let old_t = tables(&[(1, "accounts")]);
    let new_t = tables(&[(1, "accounts"), (9, "payments")]);
    let c = columns(&[("accounts", &[("ssn", "varchar|11|true|SSN_MASK|true")])]);

    let findings = diff(&old_t, &c, &new_t, &c);
    assert_eq!(findings.len(), 1);
    assert_eq!(findings[0].change, ChangeKind::TableAdded);
    assert_eq!(findings[0].table, "payments");
    assert_eq!(
        findings[0].to_string(),
        "New table added to the inventory. Table: payments"
    );
}

#[test]
fn test_table_rename_reports_new_name() {
    let old_t = tables(&[(1, "accounts")]);
    let new_t = tables(&[(1, "accounts_v2")]);
    let empty = ColumnSnapshot::new();

    let findings = diff(&old_t, &empty, &new_t, &empty);
    assert_eq!(findings.len(), 1);
    assert_eq!(findings[0].change, ChangeKind::TableRenamed);
    assert_eq!(
        findings[0].to_string(),
        "Table name changed. New Table name: accounts_v2"
    );
}

#[test]
fn test_deleted_column_never_reported() {
    let t = tables(&[(1, "accounts")]);
    let old_c = columns(&[(
        "accounts",
        &[
            ("ssn", "varchar|11|true|SSN_MASK|true"),
            ("phone", "varchar|15|true|PHONE_MASK|true"),
        ],
    )]);
    let new_c = columns(&[("accounts", &[("ssn", "varchar|11|true|SSN_MASK|true")])]);
    assert!(diff(&t, &old_c, &t, &new_c).is_empty());
}

#[test]
fn test_new_column_added() {
    let t = tables(&[(1, "accounts")]);
    let old_c = columns(&[("accounts", &[("ssn", "varchar|11|true|SSN_MASK|true")])]);
    let new_c = columns(&[(
        "accounts",
        &[
            ("ssn", "varchar|11|true|SSN_MASK|true"),
            ("email", "varchar|120|false||true"),
        ],
    )]);

    let findings = diff(&t, &old_c, &t, &new_c);
    assert_eq!(findings.len(), 1);
    assert_eq!(findings[0].change, ChangeKind::ColumnAdded);
    assert_eq!(
        findings[0].to_string(),
        "New column added. Table: accounts / Column: email"
    );
}

#[test]
fn test_pii_flip_suppresses_every_other_rule() {
    let t = tables(&[(1, "accounts")]);
    // Flag flips AND algorithm, data type, and length all change; only the
    // PII indicator rule may fire.
    let old_c = columns(&[("accounts", &[("ssn", "varchar|11|false||true")])]);
    let new_c = columns(&[("accounts", &[("ssn", "number|20|true|SSN_MASK|true")])]);

    let findings = diff(&t, &old_c, &t, &new_c);
    assert_eq!(findings.len(), 1);
    assert_eq!(findings[0].change, ChangeKind::PiiIndicatorChanged);
    assert_eq!(findings[0].column.as_deref(), Some("ssn"));
    assert!(findings[0]
        .to_string()
        .contains("Column PII indicator changed from no PII to PII or vice versa"));
    assert!(findings[0].to_string().contains("Table: accounts / Column: ssn"));
}

#[test]
fn test_algorithm_reassignment_on_masked_column() {
    let t = tables(&[(1, "accounts")]);
    let old_c = columns(&[("accounts", &[("ssn", "varchar|50|true|SSN_MASK|true")])]);
    let new_c = columns(&[("accounts", &[("ssn", "varchar|50|true|PHONE_MASK|true")])]);

    let findings = diff(&t, &old_c, &t, &new_c);
    assert_eq!(findings.len(), 1);
    assert_eq!(findings[0].change, ChangeKind::AlgorithmChanged);
    assert_eq!(
        findings[0].to_string(),
        "Algorithm assignment changed. Table: accounts / Column: ssn"
    );
}

#[test]
fn test_data_type_change_beats_length_change() {
    let t = tables(&[(1, "accounts")]);
    let old_c = columns(&[("accounts", &[("ssn", "varchar|11|true|SSN_MASK|true")])]);
    let new_c = columns(&[("accounts", &[("ssn", "number|20|true|SSN_MASK|true")])]);

    let findings = diff(&t, &old_c, &t, &new_c);
    assert_eq!(findings.len(), 1);
    assert_eq!(findings[0].change, ChangeKind::DataTypeChanged);
}

#[test]
fn test_length_change_on_masked_column() {
    let t = tables(&[(1, "accounts")]);
    let old_c = columns(&[("accounts", &[("ssn", "varchar|11|true|SSN_MASK|true")])]);
    let new_c = columns(&[("accounts", &[("ssn", "varchar|20|true|SSN_MASK|true")])]);

    let findings = diff(&t, &old_c, &t, &new_c);
    assert_eq!(findings.len(), 1);
    assert_eq!(findings[0].change, ChangeKind::ColumnLengthChanged);
}

#[test]
fn test_changes_outside_masking_rules_are_flagged_unclassified() {
    let t = tables(&[(1, "accounts")]);

    // Profiler-writable flip on a masked column.
    let old_c = columns(&[("accounts", &[("ssn", "varchar|11|true|SSN_MASK|true")])]);
    let new_c = columns(&[("accounts", &[("ssn", "varchar|11|true|SSN_MASK|false")])]);
    let findings = diff(&t, &old_c, &t, &new_c);
    assert_eq!(findings.len(), 1);
    assert_eq!(findings[0].change, ChangeKind::UnclassifiedChange);

    // Data type change on an unmasked column.
    let old_c = columns(&[("accounts", &[("note", "varchar|80|false||true")])]);
    let new_c = columns(&[("accounts", &[("note", "clob|80|false||true")])]);
    let findings = diff(&t, &old_c, &t, &new_c);
    assert_eq!(findings.len(), 1);
    assert_eq!(findings[0].change, ChangeKind::UnclassifiedChange);
    assert_eq!(
        findings[0].to_string(),
        "Column metadata changed outside masking rules. Table: accounts / Column: note"
    );
}

#[test]
fn test_findings_follow_new_snapshot_order_tables_first() {
    let old_t = tables(&[(1, "zulu"), (2, "alpha")]);
    let new_t = tables(&[(1, "zulu"), (2, "alpha"), (3, "sierra"), (4, "bravo")]);
    let old_c = columns(&[
        ("zulu", &[("z1", "varchar|10|true|M1|true")]),
        ("alpha", &[("a1", "varchar|10|true|M1|true")]),
    ]);
    let new_c = columns(&[
        ("zulu", &[("z1", "varchar|10|true|M2|true"), ("z2", "varchar|10|false||true")]),
        ("alpha", &[("a1", "varchar|99|true|M1|true")]),
    ]);

    let findings = diff(&old_t, &old_c, &new_t, &new_c);
    let summary: Vec<(ChangeKind, &str)> = findings
        .iter()
        .map(|f| (f.change, f.table.as_str()))
        .collect();
    assert_eq!(
        summary,
        vec![
            (ChangeKind::TableAdded, "sierra"),
            (ChangeKind::TableAdded, "bravo"),
            (ChangeKind::AlgorithmChanged, "zulu"),
            (ChangeKind::ColumnAdded, "zulu"),
            (ChangeKind::ColumnLengthChanged, "alpha"),
        ]
    );
}
