use crate::models::CategoryGroup;

/// Keyword table per functional group, tested in order; first match wins
const GROUP_KEYWORDS: &[(CategoryGroup, &[&str])] = &[
    (
        CategoryGroup::Tops,
        &[
            "shirt", "t-shirt", "tee", "blouse", "top", "tank", "polo", "sweater", "sweatshirt",
            "tunic", "camisole", "crop",
        ],
    ),
    (
        CategoryGroup::Bottoms,
        &["pant", "jean", "trouser", "short", "skirt", "legging", "chino", "jogger", "slack"],
    ),
    (
        CategoryGroup::Dresses,
        &["dress", "gown", "jumpsuit", "romper", "kaftan"],
    ),
    (
        CategoryGroup::Outerwear,
        &["jacket", "coat", "hoodie", "blazer", "cardigan", "parka", "windbreaker", "vest"],
    ),
    (
        CategoryGroup::Footwear,
        &["shoe", "sneaker", "boot", "sandal", "heel", "loafer", "slipper", "flat", "trainer"],
    ),
    (
        CategoryGroup::Accessories,
        &[
            "hat", "cap", "scarf", "belt", "bag", "watch", "sunglass", "jewel", "necklace",
            "bracelet", "earring", "glove", "umbrella",
        ],
    ),
];

/// Maps a free-text category to its functional group
///
/// Total: anything unrecognised is `Other`.
pub fn classify(category: &str) -> CategoryGroup {
    let category = category.to_lowercase();

    GROUP_KEYWORDS
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|k| category.contains(k)))
        .map(|(group, _)| *group)
        .unwrap_or(CategoryGroup::Other)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_common_categories() {
        assert_eq!(classify("T-shirt"), CategoryGroup::Tops);
        assert_eq!(classify("Blouse"), CategoryGroup::Tops);
        assert_eq!(classify("Jeans"), CategoryGroup::Bottoms);
        assert_eq!(classify("Pleated Skirt"), CategoryGroup::Bottoms);
        assert_eq!(classify("Maxi Dress"), CategoryGroup::Dresses);
        assert_eq!(classify("Rain Jacket"), CategoryGroup::Outerwear);
        assert_eq!(classify("Hoodie"), CategoryGroup::Outerwear);
        assert_eq!(classify("Sneakers"), CategoryGroup::Footwear);
        assert_eq!(classify("Ankle Boots"), CategoryGroup::Footwear);
        assert_eq!(classify("Wool Scarf"), CategoryGroup::Accessories);
    }

    #[test]
    fn test_classify_first_match_wins() {
        // "shirt" is a top keyword and tops are tested before dresses
        assert_eq!(classify("Shirt Dress"), CategoryGroup::Tops);
        // "sweatshirt" never reaches the outerwear table
        assert_eq!(classify("Hooded Sweatshirt"), CategoryGroup::Tops);
    }

    #[test]
    fn test_classify_unknown_is_other() {
        assert_eq!(classify(""), CategoryGroup::Other);
        assert_eq!(classify("Swimwear"), CategoryGroup::Other);
    }

    #[test]
    fn test_classify_is_case_insensitive_and_deterministic() {
        assert_eq!(classify("JACKET"), classify("jacket"));
        assert_eq!(classify("Chinos"), classify("Chinos"));
    }
}
