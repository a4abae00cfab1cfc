use std::collections::BTreeMap;

use sql_session::{FromSqlValue, Keyed, Session, SqlRecord, SqlSessionError, SqlValue};

#[derive(Debug, Clone, PartialEq)]
struct Person {
    last_name: String,
    first_name: String,
    age: i64,
}

impl SqlRecord for Person {
    const COLUMNS: usize = 3;

    fn bind_values(&self, out: &mut Vec<SqlValue>) {
        out.push(SqlValue::Text(self.last_name.clone()));
        out.push(SqlValue::Text(self.first_name.clone()));
        out.push(SqlValue::Int(self.age));
    }

    fn from_row(row: &[SqlValue]) -> Result<Self, SqlSessionError> {
        Ok(Person {
            last_name: String::from_sql_value(&row[0])?,
            first_name: String::from_sql_value(&row[1])?,
            age: i64::from_sql_value(&row[2])?,
        })
    }
}

impl Keyed for Person {
    type Key = String;

    fn key(&self) -> String {
        self.last_name.clone()
    }
}

fn people() -> Vec<Person> {
    vec![
        Person {
            last_name: "Simpson".to_string(),
            first_name: "Homer".to_string(),
            age: 39,
        },
        Person {
            last_name: "Flanders".to_string(),
            first_name: "Ned".to_string(),
            age: 60,
        },
    ]
}

fn seeded_session() -> Result<Session, SqlSessionError> {
    sql_session::memory::register();
    let session = Session::open("memory", "")?;
    session
        .statement("CREATE TABLE Person (LastName TEXT, FirstName TEXT, Age INTEGER)")
        .run()?;
    let rows = people();
    session
        .statement("INSERT INTO Person VALUES(:ln, :fn, :age)")
        .bind_each(&rows)
        .run()?;
    Ok(session)
}

#[test]
fn one_record_binding_spans_several_positions() -> Result<(), SqlSessionError> {
    let session = seeded_session()?;

    let mut fetched: Vec<Person> = Vec::new();
    session
        .statement("SELECT * FROM Person")
        .fetch_all(&mut fetched)
        .run()?;
    assert_eq!(fetched, people());
    Ok(())
}

#[test]
fn associative_retrieval_uses_the_extracted_key() -> Result<(), SqlSessionError> {
    let session = seeded_session()?;

    let mut by_name: BTreeMap<String, Person> = BTreeMap::new();
    session
        .statement("SELECT * FROM Person")
        .fetch_map(&mut by_name)
        .run()?;

    assert_eq!(by_name.len(), 2);
    assert_eq!(by_name["Simpson"].first_name, "Homer");
    assert_eq!(by_name["Flanders"].age, 60);
    Ok(())
}

#[test]
fn parallel_column_vectors_also_reconcile() -> Result<(), SqlSessionError> {
    sql_session::memory::register();
    let session = Session::open("memory", "")?;
    session
        .statement("CREATE TABLE P2 (LastName TEXT, Age INTEGER)")
        .run()?;

    let names: Vec<String> = vec!["a".to_string(), "b".to_string()];
    let ages: Vec<i64> = vec![1, 2];
    let affected = session
        .statement("INSERT INTO P2 VALUES(:ln, :age)")
        .bind_each(&names)
        .bind_each(&ages)
        .run()?;
    assert_eq!(affected, 2);

    let mut record_count = 0i64;
    session
        .statement("SELECT COUNT(*) FROM P2")
        .fetch(&mut record_count)
        .run()?;
    assert_eq!(record_count, 2);
    Ok(())
}
