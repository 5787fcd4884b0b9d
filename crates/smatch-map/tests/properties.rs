//! Laws of the mapping generator over generated schemas.

use std::collections::HashSet;

use proptest::prelude::*;
use smatch_map::{CategorySet, Cupid, CupidParams, select_one_to_one};
use smatch_model::{Column, Database, EntityId, Table};

const NAMES: &[&str] = &[
    "id", "uid", "email", "mail", "name", "first_name", "lastName", "created_at", "amount",
    "total", "price", "status", "zip", "postal_code", "phone",
];
const TYPES: &[&str] = &["int", "bigint", "varchar", "text", "date", "boolean", "decimal"];

fn id(value: &str) -> EntityId {
    EntityId::new(value).expect("valid id")
}

fn database_strategy(db: &'static str) -> impl Strategy<Value = Database> {
    prop::collection::vec(
        prop::collection::vec((0..NAMES.len(), 0..TYPES.len()), 0..6),
        1..4,
    )
    .prop_map(move |tables| {
        let tables = tables.into_iter().enumerate().map(|(t, columns)| {
            Table::with_columns(
                id(&format!("{db}/t{t}")),
                format!("table{t}"),
                id(db),
                columns.into_iter().enumerate().map(|(c, (name, ty))| {
                    Column::new(id(&format!("{db}/t{t}/c{c}")), NAMES[name], TYPES[ty])
                }),
            )
        });
        Database::with_tables(id(db), db, tables)
    })
}

proptest! {
    #[test]
    fn matches_are_one_to_one_and_accepted(
        source in database_strategy("src"),
        target in database_strategy("tgt"),
        th_accept in 0.3f64..0.95,
    ) {
        let cupid = Cupid::new(CupidParams { th_accept, ..CupidParams::default() }).unwrap();
        let matches = cupid.get_matches(&source, &target);

        let mut sources = HashSet::new();
        let mut targets = HashSet::new();
        for m in &matches {
            prop_assert!(sources.insert(m.source.column_id.clone()));
            prop_assert!(targets.insert(m.target.column_id.clone()));
            prop_assert!(m.score >= th_accept);
            prop_assert!(m.score <= 1.0);
        }
    }

    #[test]
    fn matched_columns_have_compatible_types(
        source in database_strategy("src"),
        target in database_strategy("tgt"),
    ) {
        let matches = Cupid::default().get_matches(&source, &target);
        let type_of = |db: &Database, table: &EntityId, column: &EntityId| {
            db.table(table)
                .and_then(|t| t.columns().iter().find(|c| c.id() == column))
                .map(|c| c.data_type().to_string())
        };
        let categories: CategorySet = TYPES.iter().copied().collect();
        for m in &matches {
            let s = type_of(&source, &m.source.table_id, &m.source.column_id).unwrap();
            let t = type_of(&target, &m.target.table_id, &m.target.column_id).unwrap();
            prop_assert!(categories.compatible(&s, &t), "{s} matched {t}");
        }
    }

    #[test]
    fn matching_is_deterministic(
        source in database_strategy("src"),
        target in database_strategy("tgt"),
    ) {
        let cupid = Cupid::default();
        prop_assert_eq!(cupid.get_matches(&source, &target), cupid.get_matches(&source, &target));
    }

    #[test]
    fn greedy_selection_keeps_best_pair_first(
        scores in prop::collection::vec((0u8..4, 0u8..4, 0.0f64..1.0), 0..20),
    ) {
        let selected = select_one_to_one(scores.clone(), 0.5);
        for window in selected.windows(2) {
            prop_assert!(window[0].2 >= window[1].2);
        }
        if let Some(best) = scores.iter().filter(|s| s.2 >= 0.5).map(|s| s.2).reduce(f64::max) {
            prop_assert_eq!(selected[0].2, best);
        }
    }
}
