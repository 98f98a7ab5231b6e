//! Random default nickname.
//!
//! Produces `AdjectiveNounNN` (e.g. `RustyCrab42`) so two unconfigured
//! clients on the same network are unlikely to collide.

use rand::RngExt;

const ADJECTIVES: &[&str] = &[
    "Rusty", "Salty", "Tidal", "Sandy", "Coral", "Briny", "Misty", "Deep", "Quiet", "Swift",
    "Lucky", "Sleepy", "Brave", "Calm", "Bold", "Spry", "Amber", "Pearl", "Kelp", "Drift",
];

const NOUNS: &[&str] = &[
    "Crab", "Shell", "Claw", "Reef", "Tide", "Shore", "Wave", "Squid", "Eel", "Prawn", "Krill",
    "Clam", "Gull", "Dune", "Cove", "Pinch",
];

pub fn generate_nickname() -> String {
    let mut rng = rand::rng();
    let adj = ADJECTIVES[rng.random_range(0..ADJECTIVES.len())];
    let noun = NOUNS[rng.random_range(0..NOUNS.len())];
    let num: u8 = rng.random_range(0..100);
    format!("{}{}{}", adj, noun, num)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nickname_shape() {
        for _ in 0..50 {
            let nick = generate_nickname();
            assert!(nick.chars().next().unwrap().is_ascii_uppercase());
            assert!(nick.chars().all(|c| c.is_ascii_alphanumeric()));
            let digits = nick.chars().rev().take_while(|c| c.is_ascii_digit()).count();
            assert!((1..=2).contains(&digits));
            assert!(nick.len() <= 13);
        }
    }
}
