use super::model::{Category, Gender};

/// Category keywords in priority order; the first one found in the product wins.
const CATEGORY_KEYWORDS: [(&str, Category); 3] = [
    ("Street Footwear", Category::StreetFootwear),
    ("Apparel", Category::Apparel),
    ("Athletic Footwear", Category::AthleticFootwear),
];

// "Men's" is checked first. It is not a substring of "Women's" because of the
// leading capital, so the order only matters for products naming both.
const GENDER_KEYWORDS: [(&str, Gender); 2] = [("Men's", Gender::Men), ("Women's", Gender::Women)];

/// Derive the category label from product text.
pub fn category_of(product: &str) -> Category {
    CATEGORY_KEYWORDS
        .iter()
        .find(|(keyword, _)| product.contains(keyword))
        .map_or(Category::Unknown, |&(_, category)| category)
}

/// Derive the gender label from product text. `None` when no token matches.
pub fn gender_of(product: &str) -> Option<Gender> {
    GENDER_KEYWORDS
        .iter()
        .find(|(keyword, _)| product.contains(keyword))
        .map(|&(_, gender)| gender)
}

/// Both derived labels for one product string.
pub fn classify(product: &str) -> (Category, Option<Gender>) {
    (category_of(product), gender_of(product))
}
