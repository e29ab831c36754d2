//! Struct and field names that are SQL keywords.

use rowmap::prelude::*;

#[derive(Model, Debug, Clone, PartialEq)]
struct Ticket {
    id: RowId,
    order: i64,
    group: String,
    from: Option<String>,
    index: f64,
}

#[derive(Model, Debug, Clone, PartialEq)]
struct Group {
    name: String,
}

fn ticket(order: i64, group: &str) -> Ticket {
    Ticket {
        id: RowId::ZERO,
        order,
        group: group.to_string(),
        from: None,
        index: 0.5,
    }
}

#[test]
fn test_keyword_columns_through_every_verb() {
    let conn = SqliteConnection::open_memory().unwrap();
    conn.init::<Ticket>(false).unwrap();
    conn.insert(&[ticket(2, "b"), ticket(1, "a"), ticket(3, "a")])
        .unwrap();

    let filter = Where::new().eq(Ticket::GROUP, "a").is_null(Ticket::FROM);
    let orders: Vec<i64> = conn
        .select(&filter, &OrderBy::new().desc(Ticket::ORDER))
        .unwrap()
        .map(|t| t.unwrap().order)
        .collect();
    assert_eq!(orders, [3, 1]);

    let mut first = conn
        .select(&Where::new().eq(Ticket::ORDER, 1), &OrderBy::new())
        .unwrap()
        .next()
        .unwrap()
        .unwrap();
    first.from = Some("desk".to_string());
    assert_eq!(
        conn.update(&first, &Where::new().eq(Ticket::ID, first.id))
            .unwrap(),
        1
    );

    first.index = 9.0;
    conn.upsert(&first, &Where::new().le(Ticket::INDEX, 1.0))
        .unwrap();
    let stored = conn
        .select(&Where::new().eq(Ticket::ID, first.id), &OrderBy::new())
        .unwrap()
        .read_all()
        .unwrap();
    assert_eq!(stored, vec![first]);

    assert_eq!(conn.delete(&Where::new().eq(Ticket::GROUP, "b")).unwrap(), 1);
    conn.init::<Ticket>(true).unwrap();
    conn.drop_table::<Ticket>().unwrap();
}

#[test]
fn test_keyword_table_name() {
    assert_eq!(Group::TABLE_NAME, "group");

    let conn = SqliteConnection::open_memory().unwrap();
    conn.init::<Group>(false).unwrap();
    conn.insert([&Group {
        name: "admins".to_string(),
    }])
    .unwrap();

    let groups = conn
        .select(&Where::<Group>::new(), &OrderBy::new().asc(Group::NAME))
        .unwrap()
        .read_all()
        .unwrap();
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].name, "admins");
    conn.drop_table::<Group>().unwrap();
}
