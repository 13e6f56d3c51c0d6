//! Property-based tests for `SKIP`/`FIRST` pagination.
//!
//! # Invariants tested
//!
//! - **Placement:** the clause sits directly after the leading `SELECT`.
//! - **Order:** `SKIP` always precedes `FIRST`.
//! - **Policy:** the clause matches the limit/offset combination.
//! - **Preservation:** the rest of the statement is untouched.
//! - **Rejection:** statements not starting with `SELECT` are refused unchanged.

use geodialect_core_common::{DialectError, SqlDialect};
use geodialect_informix::{InformixDialect, InformixDialectBasic, InformixDialectPrepared};
use proptest::prelude::*;

const UNBOUNDED: u64 = i32::MAX as u64;

fn expected_clause(limit: Option<u64>, offset: u64) -> String {
    match (limit.filter(|&n| n < UNBOUNDED), offset) {
        (Some(n), 0) => format!(" FIRST {n}"),
        (Some(n), o) => format!(" SKIP {o} FIRST {n}"),
        (None, 0) => String::new(),
        (None, o) => format!(" SKIP {o}"),
    }
}

fn limit_strategy() -> impl Strategy<Value = Option<u64>> {
    prop_oneof![
        Just(None),
        Just(Some(UNBOUNDED)),
        Just(Some(0)),
        (1_u64..10_000).prop_map(Some),
        (UNBOUNDED..u64::MAX).prop_map(Some),
    ]
}

fn offset_strategy() -> impl Strategy<Value = u64> {
    prop_oneof![Just(0_u64), 1_u64..1_000_000]
}

fn select_body() -> impl Strategy<Value = String> {
    "[a-z_]{1,12}( , [a-z_]{1,12}){0,3} FROM [a-z_]{1,12}( WHERE [a-z]{1,5} > [0-9]{1,3})?"
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn clause_matches_policy(
        limit in limit_strategy(),
        offset in offset_strategy(),
        body in select_body(),
    ) {
        let original = format!("SELECT {body}");
        let mut sql = original.clone();
        InformixDialect::new().apply_limit_offset(&mut sql, limit, offset).unwrap();

        let clause = expected_clause(limit, offset);
        prop_assert_eq!(&sql, &format!("SELECT{clause} {body}"));
        prop_assert!(sql.starts_with("SELECT"));
        prop_assert!(sql.ends_with(&body));
        prop_assert_eq!(sql.len(), original.len() + clause.len());
    }

    #[test]
    fn skip_precedes_first(
        limit in (0_u64..UNBOUNDED).prop_map(Some),
        offset in 1_u64..1_000_000,
    ) {
        let mut sql = "SELECT a FROM t".to_string();
        InformixDialect::new().apply_limit_offset(&mut sql, limit, offset).unwrap();
        let skip = sql.find(" SKIP ").unwrap();
        let first = sql.find(" FIRST ").unwrap();
        prop_assert_eq!(skip, "SELECT".len());
        prop_assert!(skip < first);
    }

    #[test]
    fn facades_agree_with_rule_set(
        limit in limit_strategy(),
        offset in offset_strategy(),
    ) {
        let mut rules = "SELECT * FROM roads".to_string();
        let mut basic = rules.clone();
        let mut prepared = rules.clone();
        InformixDialect::new().apply_limit_offset(&mut rules, limit, offset).unwrap();
        InformixDialectBasic::new().apply_limit_offset(&mut basic, limit, offset).unwrap();
        InformixDialectPrepared::new().apply_limit_offset(&mut prepared, limit, offset).unwrap();
        prop_assert_eq!(&rules, &basic);
        prop_assert_eq!(&rules, &prepared);
    }

    #[test]
    fn non_select_is_rejected(
        prefix in "(select|Select|WITH|INSERT|UPDATE| SELECT|\\(SELECT)",
        limit in limit_strategy(),
        offset in offset_strategy(),
    ) {
        let original = format!("{prefix} a FROM t");
        let mut sql = original.clone();
        let err = InformixDialect::new()
            .apply_limit_offset(&mut sql, limit, offset)
            .unwrap_err();
        let is_invalid_query = matches!(err, DialectError::InvalidQuery { .. });
        prop_assert!(is_invalid_query);
        prop_assert_eq!(sql, original);
    }
}
