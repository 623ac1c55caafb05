//! Static restaurant directory embedded in every plan prompt.

pub struct DirectoryEntry {
    pub name: &'static str,
    pub description: &'static str,
    pub reviews: [&'static str; 3],
}

/// Order is part of the prompt and must stay stable.
pub const RESTAURANT_DIRECTORY: [DirectoryEntry; 8] = [
    DirectoryEntry {
        name: "The Golden Fork",
        description: "Cozy bistro with seasonal menus, candlelit tables, and a curated local wine list.",
        reviews: [
            "Warm, intimate atmosphere and attentive staff.",
            "Food is consistently excellent, but reservations are a must.",
            "Great date-night spot with a strong wine pairing program.",
        ],
    },
    DirectoryEntry {
        name: "Harbor Grill",
        description: "Seafood-forward spot with a breezy patio, fast service, and generous portions.",
        reviews: [
            "Fresh oysters and quick service, perfect for lunch.",
            "Patio views are great, but it gets busy on weekends.",
            "Big portions and fair prices for seafood lovers.",
        ],
    },
    DirectoryEntry {
        name: "Spice Avenue",
        description: "Bold, aromatic curries with customizable heat levels and plenty of vegetarian options.",
        reviews: [
            "Complex flavors and great vegan choices.",
            "Heat level can be intense, but staff will adjust it.",
            "Aromatic dishes and generous spice blends.",
        ],
    },
    DirectoryEntry {
        name: "Stone Oven Pizzeria",
        description: "Neapolitan-style pies, blistered crusts, and a casual, family-friendly vibe.",
        reviews: [
            "Crust is perfectly charred and airy.",
            "Kids loved it; service was friendly and fast.",
            "Simple menu, executed well.",
        ],
    },
    DirectoryEntry {
        name: "Maple & Smoke",
        description: "Slow-smoked meats, house-made sauces, and a rustic interior with live weekend music.",
        reviews: [
            "Brisket is tender with a deep smoky flavor.",
            "Lively vibe on weekends, sometimes a bit loud.",
            "Sauces are outstanding and sides are hearty.",
        ],
    },
    DirectoryEntry {
        name: "Garden Table",
        description: "Farm-to-table plates, bright natural lighting, and a focus on fresh, local produce.",
        reviews: [
            "Fresh ingredients and beautiful plating.",
            "Light, clean flavors with seasonal variety.",
            "Great for brunch; coffee is excellent.",
        ],
    },
    DirectoryEntry {
        name: "Noodle Lantern",
        description: "Hand-pulled noodles, rich broths, and quick weekday lunch specials.",
        reviews: [
            "Broths are rich and noodles have great chew.",
            "Fast service and solid value for lunch.",
            "Small seating area but turnover is quick.",
        ],
    },
    DirectoryEntry {
        name: "Saffron Lounge",
        description: "Elegant decor, attentive service, and refined tasting menus for special occasions.",
        reviews: [
            "Impeccable service and refined plating.",
            "Tasting menu feels luxurious and well-paced.",
            "Pricey, but excellent for celebrations.",
        ],
    },
];
