//! Display names for connected clients.

use rand::seq::IndexedRandom;

const FIRST_NAMES: &[&str] = &[
    "Alice", "Bohdan", "Carmen", "Dmytro", "Elena", "Felix", "Galyna", "Hugo", "Iryna", "Jonas",
    "Kateryna", "Leon", "Maria", "Nazar", "Olena", "Pavlo", "Quinn", "Roman", "Sofia", "Taras",
    "Ursula", "Viktor", "Wanda", "Yaryna", "Zoe",
];

const LAST_NAMES: &[&str] = &[
    "Anderson", "Bondarenko", "Carter", "Danylenko", "Evans", "Franko", "Garcia", "Hrytsenko",
    "Ivanenko", "Jensen", "Kovalenko", "Lysenko", "Moroz", "Novak", "Oliynyk", "Petrenko",
    "Quintero", "Rudenko", "Shevchenko", "Tkachenko", "Usenko", "Vasylenko", "Walker", "Yurchenko",
    "Zinchenko",
];

/// Produces a "First Last" display name for a new connection.
pub trait NameSource: Send + Sync {
    /// Next candidate name. Uniqueness is enforced by the registry.
    fn full_name(&self) -> String;
}

/// Random first/last combination.
#[derive(Clone, Copy, Debug, Default)]
pub struct RandomNames;

impl NameSource for RandomNames {
    fn full_name(&self) -> String {
        let mut rng = rand::rng();
        let first = FIRST_NAMES.choose(&mut rng).copied().unwrap_or("Anonymous");
        let last = LAST_NAMES.choose(&mut rng).copied().unwrap_or("Guest");
        format!("{first} {last}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn random_name_has_two_parts() {
        let name = RandomNames.full_name();
        let parts: Vec<&str> = name.split(' ').collect();
        assert_eq!(parts.len(), 2);
        assert!(FIRST_NAMES.contains(&parts[0]));
        assert!(LAST_NAMES.contains(&parts[1]));
    }

    #[test]
    fn name_lists_have_no_spaces() {
        for name in FIRST_NAMES.iter().chain(LAST_NAMES) {
            assert!(!name.contains(' '), "{name}");
        }
    }
}
