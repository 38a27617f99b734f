//! Mapper derive and statement execution against an in-memory executor.

use sqler::prelude::*;
use sqler::{InstrumentedClient, Placeholder, SqlerConfig, from_row, scan_row};
use std::sync::Mutex;

#[derive(Debug, Default, Clone, PartialEq, Mapper)]
struct TestStruct {
    f1: i64,
    #[sqler(column = "f_2")]
    f2: String,
}

#[derive(Debug, Default, Clone, PartialEq, Mapper)]
struct Account {
    id: i64,
    email: Option<String>,
    active: bool,
    #[sqler(skip)]
    session: Option<String>,
    r#type: String,
}

#[allow(non_snake_case)]
#[derive(Debug, Default, Clone, PartialEq, Mapper)]
struct Legacy {
    UserID: i32,
    Name: String,
}

#[derive(Debug, Default, Clone, PartialEq, Mapper)]
struct Widths {
    tiny: i8,
    small: i16,
    int: i32,
    big: i64,
    byte: u8,
    word: u16,
    dword: u32,
    ratio: f32,
}

/// Records every statement and serves canned rows.
#[derive(Default)]
struct RecordingDb {
    statements: Mutex<Vec<(String, Vec<Value>)>>,
    rows: Vec<ValuesMap>,
    placeholder: Placeholder,
}

impl RecordingDb {
    fn with_rows(rows: Vec<ValuesMap>) -> Self {
        Self {
            rows,
            ..Self::default()
        }
    }

    fn recorded(&self) -> Vec<(String, Vec<Value>)> {
        self.statements.lock().unwrap().clone()
    }
}

impl Execer for RecordingDb {
    async fn exec(&self, sql: &str, values: &[Value]) -> SqlerResult<u64> {
        self.statements
            .lock()
            .unwrap()
            .push((sql.to_string(), values.to_vec()));
        Ok(1)
    }

    fn placeholder(&self) -> Placeholder {
        self.placeholder
    }
}

impl Querier for RecordingDb {
    type Row = ValuesMap;

    async fn query(&self, sql: &str, values: &[Value]) -> SqlerResult<Vec<ValuesMap>> {
        self.statements
            .lock()
            .unwrap()
            .push((sql.to_string(), values.to_vec()));
        Ok(self.rows.clone())
    }
}

fn sample() -> TestStruct {
    TestStruct {
        f1: 1,
        f2: "qwe".to_string(),
    }
}

// ==================== field mapping ====================

#[test]
fn struct_values_all() {
    assert_eq!(sample().values(), values! { "f1" => 1, "f_2" => "qwe" });
}

#[test]
fn struct_values_single_specified() {
    assert_eq!(
        sample().values_of(&[TestStruct::COL_F2]),
        values! { "f_2" => "qwe" }
    );
}

#[test]
fn struct_values_both_specified() {
    assert_eq!(
        sample().values_of(&[TestStruct::COL_F1, TestStruct::COL_F2]),
        values! { "f1" => 1, "f_2" => "qwe" }
    );
}

#[test]
fn unknown_members_are_ignored() {
    assert!(sample().values_of(&["nope"]).is_empty());
    assert_eq!(TestStruct::fields_of(&["nope", "f1"]), vec!["f1"]);
}

#[test]
fn fields_follow_declaration_and_request_order() {
    assert_eq!(TestStruct::FIELDS, &["f1", "f_2"]);
    assert_eq!(TestStruct::fields(), vec!["f1", "f_2"]);
    assert_eq!(
        TestStruct::fields_of(&[TestStruct::COL_F2, TestStruct::COL_F1]),
        vec!["f_2", "f1"]
    );
}

#[test]
fn default_names_are_lowercased() {
    assert_eq!(Legacy::FIELDS, &["userid", "name"]);
    assert_eq!(Legacy::COL_USERID, "userid");
}

#[test]
fn skipped_fields_and_raw_identifiers() {
    assert_eq!(Account::FIELDS, &["id", "email", "active", "type"]);
    assert_eq!(Account::COL_TYPE, "type");
    let acc = Account {
        id: 3,
        email: None,
        active: true,
        session: Some("secret".into()),
        r#type: "admin".into(),
    };
    let values = acc.values();
    assert_eq!(values.get("email"), Some(&Value::Null));
    assert!(!values.contains("session"));
}

#[test]
fn update_with_mapper() {
    let s = sample();
    let upd = Update::new("t1", s.values_of(&[TestStruct::COL_F1]))
        .filter(s.equal_values(&[TestStruct::COL_F2]));
    let (sql, values) = upd.format();
    assert_eq!(sql, "UPDATE t1 SET f1 = ? WHERE f_2 = ?");
    assert_eq!(values, vec![Value::Int(1), Value::Text("qwe".into())]);
}

#[test]
fn insert_from_struct() {
    let (sql, values) = Insert::new("test", sample().values()).format();
    assert_eq!(sql, "INSERT INTO test (f1, f_2) VALUES(?, ?)");
    assert_eq!(values, vec![Value::Int(1), Value::Text("qwe".into())]);
}

// ==================== setting values ====================

#[test]
fn every_integer_width_maps_both_ways() {
    let w = Widths {
        tiny: i8::MIN,
        small: i16::MAX,
        int: -7,
        big: i64::MAX,
        byte: u8::MAX,
        word: u16::MAX,
        dword: u32::MAX,
        ratio: 0.5,
    };
    let mut back = Widths::default();
    back.set_values(w.values()).unwrap();
    assert_eq!(back, w);

    let err = back.set_values(values! { "byte" => 256 }).unwrap_err();
    assert!(err.is_decode());
    assert_eq!(back.byte, u8::MAX);
}

#[test]
fn set_values_ignores_unknown_columns() {
    let mut s = TestStruct::default();
    s.set_values(values! { "f1" => 5, "f_2" => "x", "other" => 1 })
        .unwrap();
    assert_eq!(
        s,
        TestStruct {
            f1: 5,
            f2: "x".into()
        }
    );
}

#[test]
fn set_values_is_all_or_nothing() {
    let mut s = sample();
    let err = s
        .set_values(values! { "f1" => 9, "f_2" => 10 })
        .unwrap_err();
    assert!(err.is_decode());
    assert!(err.to_string().contains("'f_2'"));
    assert_eq!(s, sample());
}

#[test]
fn set_value_reports_unknown_column() {
    let mut s = sample();
    assert!(s.set_value("f1", 42).unwrap());
    assert!(!s.set_value("missing", 42).unwrap());
    assert_eq!(s.f1, 42);
}

#[test]
fn null_into_option_field() {
    let mut acc = Account {
        email: Some("a@b.c".into()),
        ..Account::default()
    };
    acc.set_values(values! { "email" => Value::Null }).unwrap();
    assert_eq!(acc.email, None);
}

// ==================== scanning rows ====================

#[test]
fn scan_row_matches_column_names() {
    let row = values! { "f1" => 7, "f_2" => "row", "extra" => true };
    let mut s = TestStruct::default();
    scan_row(&row, &mut s).unwrap();
    assert_eq!(s.f1, 7);
    assert_eq!(s.f2, "row");
}

#[test]
fn scan_row_keeps_unmatched_fields() {
    let row = values! { "f1" => 7 };
    let mut s = sample();
    s.scan_row(&row).unwrap();
    assert_eq!(s.f1, 7);
    assert_eq!(s.f2, "qwe");
}

#[test]
fn scan_row_does_not_fill_skipped_fields() {
    let row = values! { "id" => 1, "session" => "leak", "active" => 1 };
    let acc: Account = from_row(&row).unwrap();
    assert_eq!(acc.id, 1);
    assert!(acc.active);
    assert_eq!(acc.session, None);
}

// ==================== execution ====================

#[tokio::test]
async fn exec_uses_question_placeholders_by_default() {
    let db = RecordingDb::default();
    let affected = Insert::new("test", sample().values()).exec(&db).await.unwrap();
    assert_eq!(affected, 1);
    assert_eq!(
        db.recorded(),
        vec![(
            "INSERT INTO test (f1, f_2) VALUES(?, ?)".to_string(),
            vec![Value::Int(1), Value::Text("qwe".into())]
        )]
    );
}

#[tokio::test]
async fn exec_rebinds_for_dollar_executors() {
    let db = RecordingDb {
        placeholder: Placeholder::Dollar,
        ..RecordingDb::default()
    };
    Update::new("t1", values! { "f1" => 2 })
        .filter(part("f_2 = ?", ["qwe"]))
        .exec(&db)
        .await
        .unwrap();
    assert_eq!(db.recorded()[0].0, "UPDATE t1 SET f1 = $1 WHERE f_2 = $2");
}

#[tokio::test]
async fn exec_rejects_empty_insert() {
    let db = RecordingDb::default();
    let err = Insert::new("test", ValuesMap::new()).exec(&db).await.unwrap_err();
    assert!(err.is_validation());
    assert!(err.to_string().contains("requires at least one column value"));
    assert!(db.recorded().is_empty());
}

#[tokio::test]
async fn exec_rejects_filter_without_known_columns() {
    let db = RecordingDb::default();
    let s = sample();
    let err = Update::new("t1", s.values_of(&[TestStruct::COL_F1]))
        .filter(s.equal_values(&["typo"]))
        .exec(&db)
        .await
        .unwrap_err();
    assert!(err.is_validation());
    assert!(db.recorded().is_empty());
}

#[tokio::test]
async fn replace_exec() {
    let db = RecordingDb::default();
    Replace::new("test", values! { "f1" => 1 }).exec(&db).await.unwrap();
    assert_eq!(db.recorded()[0].0, "REPLACE INTO test (f1) VALUES(?)");
}

#[tokio::test]
async fn select_fetch_all_maps_rows() {
    let db = RecordingDb::with_rows(vec![
        values! { "f1" => 1, "f_2" => "a" },
        values! { "f1" => 2, "f_2" => "b" },
    ]);
    let rows: Vec<TestStruct> = Select::new("test")
        .fields(TestStruct::FIELDS)
        .filter(part("f1 > ?", [0]))
        .fetch_all(&db)
        .await
        .unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[1].f2, "b");
    assert_eq!(
        db.recorded()[0],
        (
            "SELECT f1, f_2 FROM test WHERE f1 > ?".to_string(),
            vec![Value::Int(0)]
        )
    );
}

#[tokio::test]
async fn select_query_row_not_found() {
    let db = RecordingDb::default();
    let err = Select::new("test").query_row(&db).await.unwrap_err();
    assert!(err.is_not_found());

    let none: Option<TestStruct> = Select::new("test").fetch_opt(&db).await.unwrap();
    assert_eq!(none, None);
}

#[tokio::test]
async fn select_fetch_one_takes_first_row() {
    let db = RecordingDb::with_rows(vec![
        values! { "f1" => 1, "f_2" => "first" },
        values! { "f1" => 2, "f_2" => "second" },
    ]);
    let one: TestStruct = Select::new("test").fetch_one(&db).await.unwrap();
    assert_eq!(one.f2, "first");
}

#[tokio::test]
async fn raw_part_executes() {
    let db = RecordingDb::default();
    part("DELETE FROM test WHERE f1 = ?", [1])
        .exec(&db)
        .await
        .unwrap();
    assert_eq!(db.recorded()[0].0, "DELETE FROM test WHERE f1 = ?");

    let err = part("DELETE FROM test WHERE f1 = ?", Vec::<Value>::new())
        .exec(&db)
        .await
        .unwrap_err();
    assert!(err.to_string().contains("placeholder count mismatch"));
}

#[tokio::test]
async fn instrumented_client_overrides_placeholder() {
    let client = InstrumentedClient::new(RecordingDb::default())
        .with_config(SqlerConfig::new().placeholder(Placeholder::Dollar));
    Insert::new("test", sample().values())
        .exec(&client)
        .await
        .unwrap();
    assert_eq!(
        client.inner().recorded()[0].0,
        "INSERT INTO test (f1, f_2) VALUES($1, $2)"
    );
}

#[tokio::test]
async fn instrumented_client_passes_rows_through() {
    let client = InstrumentedClient::new(RecordingDb::with_rows(vec![
        values! { "f1" => 5, "f_2" => "x" },
    ]));
    let rows: Vec<TestStruct> = Select::new("test").fetch_all(&client).await.unwrap();
    assert_eq!(rows, vec![TestStruct { f1: 5, f2: "x".into() }]);
}
