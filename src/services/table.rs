//! Filter and sort engines for the user table.
//!
//! Both are pure functions over borrowed slices; they never mutate their
//! input and always return a fresh sequence.

use crate::models::{SortConfig, SortField, User};

/// Comparison key for one column.
///
/// A single sort only ever compares keys of the same variant.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum SortKey {
    Number(u64),
    Text(String),
}

/// Key used to order `user` by `field`. Text columns compare case-insensitively.
pub fn sort_value(user: &User, field: SortField) -> SortKey {
    match field {
        SortField::Id => SortKey::Number(user.id),
        SortField::Name => SortKey::Text(user.name.to_lowercase()),
        SortField::Username => SortKey::Text(user.username.to_lowercase()),
        SortField::Email => SortKey::Text(user.email.to_lowercase()),
        SortField::Phone => SortKey::Text(user.phone.to_lowercase()),
        SortField::CompanyName => SortKey::Text(user.company_name().to_lowercase()),
    }
}

/// Stable sort by `config`. Descending reverses the comparator, so equal keys
/// keep their input order in both directions.
pub fn sort_users(users: &[User], config: SortConfig) -> Vec<User> {
    let mut keyed: Vec<(SortKey, &User)> = users
        .iter()
        .map(|user| (sort_value(user, config.field), user))
        .collect();

    keyed.sort_by(|(a, _), (b, _)| config.direction.apply(a.cmp(b)));

    keyed.into_iter().map(|(_, user)| user.clone()).collect()
}

/// True if the already lower-cased `needle` occurs in any searchable field.
pub fn matches_term(user: &User, needle: &str) -> bool {
    user.id.to_string().contains(needle)
        || user.name.to_lowercase().contains(needle)
        || user.username.to_lowercase().contains(needle)
        || user.email.to_lowercase().contains(needle)
        || user.phone.to_lowercase().contains(needle)
        || user.company_name().to_lowercase().contains(needle)
}

/// Users matching `term`, in their original relative order.
///
/// A blank term returns every user unchanged. Otherwise the term is
/// lower-cased (but not trimmed) and matched as a substring.
pub fn filter_users(users: &[User], term: &str) -> Vec<User> {
    if term.trim().is_empty() {
        return users.to_vec();
    }

    let needle = term.to_lowercase();
    users
        .iter()
        .filter(|user| matches_term(user, &needle))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Company, SortDirection};
    use proptest::prelude::*;

    fn user(id: u64, name: &str, company: &str) -> User {
        User {
            id,
            name: name.to_string(),
            username: format!("{}_{}", name.to_lowercase(), id),
            email: format!("{}@example.com", name.to_lowercase()),
            phone: format!("1-555-{:04}", id),
            company: Company {
                name: company.to_string(),
            },
        }
    }

    fn names(users: &[User]) -> Vec<&str> {
        users.iter().map(|u| u.name.as_str()).collect()
    }

    #[test]
    fn test_sort_by_id_then_name_desc() {
        let users = vec![user(2, "Bob", "Beta"), user(1, "Amy", "Alpha")];

        let by_id = sort_users(&users, SortConfig::new(SortField::Id, SortDirection::Ascending));
        assert_eq!(names(&by_id), vec!["Amy", "Bob"]);

        let by_name =
            sort_users(&users, SortConfig::new(SortField::Name, SortDirection::Descending));
        assert_eq!(names(&by_name), vec!["Bob", "Amy"]);
    }

    #[test]
    fn test_sort_does_not_mutate_input() {
        let users = vec![user(2, "Bob", "Beta"), user(1, "Amy", "Alpha")];
        let before = users.clone();

        let _ = sort_users(&users, SortConfig::default());
        assert_eq!(users, before);
    }

    #[test]
    fn test_sort_id_is_numeric() {
        let users = vec![user(10, "Ten", "x"), user(9, "Nine", "x"), user(100, "Hundred", "x")];
        let sorted = sort_users(&users, SortConfig::default());
        assert_eq!(names(&sorted), vec!["Nine", "Ten", "Hundred"]);
    }

    #[test]
    fn test_sort_text_is_case_insensitive() {
        let users = vec![user(1, "bob", "x"), user(2, "Amy", "x"), user(3, "carl", "x")];
        let sorted = sort_users(&users, SortConfig::new(SortField::Name, SortDirection::Ascending));
        assert_eq!(names(&sorted), vec!["Amy", "bob", "carl"]);
    }

    #[test]
    fn test_sort_by_company_name() {
        let users = vec![
            user(1, "Amy", "zeta corp"),
            user(2, "Bob", "Alpha Inc"),
            user(3, "Cat", "mid LLC"),
        ];
        let sorted = sort_users(
            &users,
            SortConfig::new(SortField::CompanyName, SortDirection::Ascending),
        );
        assert_eq!(names(&sorted), vec!["Bob", "Cat", "Amy"]);
    }

    #[test]
    fn test_sort_ties_keep_input_order_in_both_directions() {
        let users = vec![
            user(1, "Amy", "Same"),
            user(2, "Bob", "Other"),
            user(3, "Cat", "Same"),
        ];

        let asc = sort_users(
            &users,
            SortConfig::new(SortField::CompanyName, SortDirection::Ascending),
        );
        assert_eq!(names(&asc), vec!["Bob", "Amy", "Cat"]);

        let desc = sort_users(
            &users,
            SortConfig::new(SortField::CompanyName, SortDirection::Descending),
        );
        assert_eq!(names(&desc), vec!["Amy", "Cat", "Bob"]);
    }

    #[test]
    fn test_filter_case_insensitive_and_id() {
        let users = vec![user(7, "Bret", "Romaguera"), user(12, "Zed", "Other")];

        for term in ["BRET", "ret", "7"] {
            let found = filter_users(&users, term);
            assert_eq!(names(&found), vec!["Bret"], "term {:?}", term);
        }
        assert!(filter_users(&users, "xyz").is_empty());
    }

    #[test]
    fn test_filter_matches_every_field() {
        let users = vec![user(1, "Amy", "Romaguera-Crona")];

        assert_eq!(filter_users(&users, "amy_1").len(), 1);
        assert_eq!(filter_users(&users, "@EXAMPLE").len(), 1);
        assert_eq!(filter_users(&users, "555-0001").len(), 1);
        assert_eq!(filter_users(&users, "crona").len(), 1);
    }

    #[test]
    fn test_filter_blank_term_is_identity() {
        let users = vec![user(2, "Bob", "x"), user(1, "Amy", "x")];
        assert_eq!(filter_users(&users, ""), users);
        assert_eq!(filter_users(&users, "   \t"), users);
    }

    #[test]
    fn test_filter_term_is_not_trimmed() {
        let users = vec![user(1, "Bret", "x")];
        assert!(filter_users(&users, " bret").is_empty());
    }

    #[test]
    fn test_filter_preserves_order() {
        let users = vec![user(3, "Cara", "x"), user(1, "Carl", "x"), user(2, "Bob", "x")];
        let found = filter_users(&users, "car");
        assert_eq!(names(&found), vec!["Cara", "Carl"]);
    }

    // Small alphabets force duplicate keys; email is made unique per position
    // so input order can be recovered after sorting.
    fn arb_users() -> impl Strategy<Value = Vec<User>> {
        prop::collection::vec(
            (1u64..20, "[a-cA-C]{0,3}", "[a-c]{1,2}", "[0-9]{1,2}", "[xyzXYZ]{0,2}"),
            0..24,
        )
        .prop_map(|rows| {
            rows.into_iter()
                .enumerate()
                .map(|(index, (id, name, username, phone, company))| User {
                    id,
                    name,
                    username,
                    email: format!("u{:03}@example.com", index),
                    phone,
                    company: Company { name: company },
                })
                .collect()
        })
    }

    fn arb_field() -> impl Strategy<Value = SortField> {
        prop::sample::select(SortField::ALL.to_vec())
    }

    fn position(user: &User) -> usize {
        user.email[1..4].parse().unwrap()
    }

    proptest! {
        #[test]
        fn prop_sort_is_stable(users in arb_users(), field in arb_field(), descending in any::<bool>()) {
            let direction = if descending { SortDirection::Descending } else { SortDirection::Ascending };
            let sorted = sort_users(&users, SortConfig::new(field, direction));

            prop_assert_eq!(sorted.len(), users.len());
            for pair in sorted.windows(2) {
                let (a, b) = (sort_value(&pair[0], field), sort_value(&pair[1], field));
                prop_assert_ne!(direction.apply(a.cmp(&b)), std::cmp::Ordering::Greater);
                if a == b {
                    prop_assert!(position(&pair[0]) < position(&pair[1]));
                }
            }
        }

        #[test]
        fn prop_descending_reverses_unique_keys(users in arb_users()) {
            let asc = sort_users(&users, SortConfig::new(SortField::Email, SortDirection::Ascending));
            let mut desc = sort_users(&users, SortConfig::new(SortField::Email, SortDirection::Descending));
            desc.reverse();
            prop_assert_eq!(asc, desc);
        }

        #[test]
        fn prop_filter_identity_on_blank(users in arb_users(), blank in "[ \t]{0,3}") {
            prop_assert_eq!(filter_users(&users, &blank), users);
        }

        #[test]
        fn prop_filter_is_idempotent(users in arb_users(), term in "[a-cA-C0-9xX]{0,2}") {
            let once = filter_users(&users, &term);
            let twice = filter_users(&once, &term);
            prop_assert_eq!(once, twice);
        }

        #[test]
        fn prop_filter_is_ordered_subsequence(users in arb_users(), term in "[a-c0-9]{1,2}") {
            let found = filter_users(&users, &term);
            let positions: Vec<usize> = found.iter().map(position).collect();
            prop_assert!(positions.windows(2).all(|w| w[0] < w[1]));
        }
    }
}
