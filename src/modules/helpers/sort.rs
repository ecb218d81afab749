use std::cmp::Ordering;

pub struct Sorting {}

impl Sorting {
    /// Orders race rounds numerically when both sides parse, lexicographically
    /// otherwise. Rounds are stored as text and old seasons are not guaranteed
    /// to hold clean numbers.
    pub fn by_round(a: &str, b: &str) -> Ordering {
        match (a.trim().parse::<i64>(), b.trim().parse::<i64>()) {
            (Ok(left), Ok(right)) => left.cmp(&right),
            _ => a.cmp(b),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rounds_compare_numerically_when_possible() {
        assert_eq!(Sorting::by_round("2", "10"), Ordering::Less);
        assert_eq!(Sorting::by_round("10", "2"), Ordering::Greater);
        assert_eq!(Sorting::by_round("3", "3"), Ordering::Equal);
    }

    #[test]
    fn rounds_fall_back_to_lexicographic() {
        assert_eq!(Sorting::by_round("II", "I"), Ordering::Greater);
        assert_eq!(Sorting::by_round("10", "IX"), Ordering::Less);
    }
}
