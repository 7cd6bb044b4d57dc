//! Property-based tests for option encoding and command-line construction.

use nfs_exportfs::option::{
    anon_gid, anon_uid, fs_id, mount_point, mp, refer, replicas, ASYNC, NO_ROOT_SQUASH,
    NO_SUBTREE_CHECK, RW, SECURE,
};
use nfs_exportfs::{export_command_line, join_options, ExportOption};
use proptest::prelude::*;

/// Values that may be blank, never containing separators.
fn any_value() -> impl Strategy<Value = String> {
    prop_oneof![
        Just(String::new()),
        Just("  ".to_string()),
        "[a-z0-9/._-]{1,12}",
    ]
}

/// Non-blank values with at least one `,`, `:` or `=` in them.
fn value_with_separator() -> impl Strategy<Value = String> {
    ("[a-z0-9/]{0,6}", prop_oneof![Just(','), Just(':'), Just('=')], "[a-z_]{0,12}")
        .prop_map(|(head, sep, tail)| format!("{}{}{}", head, sep, tail))
}

fn option_with_separator() -> impl Strategy<Value = ExportOption> {
    prop_oneof![
        value_with_separator().prop_map(|v| fs_id(&v)),
        value_with_separator().prop_map(|v| mount_point(&v)),
        (any_value(), value_with_separator()).prop_map(|(a, b)| replicas([a, b])),
        (value_with_separator(), any_value()).prop_map(|(a, b)| refer([a, b])),
    ]
}

fn any_flag() -> impl Strategy<Value = ExportOption> {
    prop_oneof![
        Just(SECURE),
        Just(RW),
        Just(ASYNC),
        Just(NO_ROOT_SQUASH),
        Just(NO_SUBTREE_CHECK),
    ]
}

fn any_valued() -> impl Strategy<Value = ExportOption> {
    prop_oneof![
        any_value().prop_map(|v| mount_point(&v)),
        any_value().prop_map(|v| mp(&v)),
        "[a-z0-9-]{1,12}".prop_map(|v| fs_id(&v)),
        proptest::collection::vec(any_value(), 0..4).prop_map(|v| refer(v)),
        proptest::collection::vec(any_value(), 0..4).prop_map(|v| replicas(v)),
        any::<u32>().prop_map(anon_uid),
        any::<u32>().prop_map(anon_gid),
    ]
}

fn any_option() -> impl Strategy<Value = ExportOption> {
    prop_oneof![any_flag(), any_valued()]
}

proptest! {
    /// Joined option strings never contain empty segments.
    #[test]
    fn test_join_has_no_empty_segments(options in proptest::collection::vec(any_option(), 0..8)) {
        let joined = join_options(&options).unwrap();
        if !joined.is_empty() {
            prop_assert!(joined.split(',').all(|segment| !segment.is_empty()));
        }
        prop_assert!(!joined.starts_with(','));
        prop_assert!(!joined.ends_with(','));
        prop_assert!(!joined.contains(",,"));
    }

    /// Reference and replica lists of blanks vanish entirely.
    #[test]
    fn test_blank_lists_are_omitted(
        blanks in proptest::collection::vec(prop_oneof![Just(""), Just(" ")], 0..5),
    ) {
        prop_assert_eq!(refer(blanks.clone()).render(), "");
        prop_assert_eq!(replicas(blanks).render(), "");
    }

    /// Non-blank values keep their order and drop the blanks.
    #[test]
    fn test_replicas_keep_order(values in proptest::collection::vec(any_value(), 1..6)) {
        let kept: Vec<&str> = values
            .iter()
            .map(String::as_str)
            .filter(|v| !v.trim().is_empty())
            .collect();
        let rendered = replicas(values.clone()).render();
        if kept.is_empty() {
            prop_assert_eq!(rendered, "");
        } else {
            prop_assert_eq!(rendered, format!("replicas={}", kept.join(":")));
        }
    }

    /// Same request, same tokens; `-o` appears only with a non-empty value.
    #[test]
    fn test_command_line_deterministic(
        path in "/[a-z]{1,8}(/[a-z]{1,8}){0,2}",
        host in "[a-z0-9.]{1,15}",
        options in proptest::collection::vec(any_option(), 0..6),
    ) {
        let first = export_command_line(&path, &host, &options).unwrap();
        let second = export_command_line(&path, &host, &options).unwrap();
        prop_assert_eq!(&first, &second);

        let tokens = first.tokens();
        prop_assert_eq!(tokens[0].as_str(), "exportfs");
        prop_assert_eq!(&tokens[1], &format!("{}:{}", host, path));
        match tokens.len() {
            2 => prop_assert_eq!(join_options(&options).unwrap(), ""),
            4 => {
                prop_assert_eq!(tokens[2].as_str(), "-o");
                prop_assert!(!tokens[3].is_empty());
            }
            n => prop_assert!(false, "unexpected token count {}", n),
        }
    }

    /// Rendering a catalog option and parsing it back yields the same encoding.
    #[test]
    fn test_parse_rendered_option(option in any_option()) {
        let rendered = option.render();
        if !rendered.is_empty() {
            let parsed: ExportOption = rendered.parse().unwrap();
            prop_assert_eq!(parsed.render(), rendered);
        }
    }

    /// A value carrying a separator is refused, alone or among valid options.
    #[test]
    fn test_separator_values_rejected(
        bad in option_with_separator(),
        before in proptest::collection::vec(any_option(), 0..3),
        after in proptest::collection::vec(any_option(), 0..3),
    ) {
        prop_assert!(bad.validate().is_err());
        let mut options = before;
        options.push(bad);
        options.extend(after);
        prop_assert!(join_options(&options).is_err());
        prop_assert!(export_command_line("/srv", "h", &options).is_err());
    }
}
