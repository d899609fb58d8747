/// Key under which the local storage backend keeps the serialized collection
pub const LOCAL_STORAGE_KEY: &str = "fridgeItems";

/// Items expiring within this many days (today included) are flagged as "eat soon"
pub const SOON_THRESHOLD_DAYS: i64 = 3;

// =============================================================================
// QUICK ADD
// =============================================================================

/// Shelf life applied to quick-add presets
pub const QUICK_ADD_SHELF_LIFE_DAYS: i64 = 7;

/// Category assigned to quick-add presets
pub const QUICK_ADD_CATEGORY: &str = "General";

/// Quick-add buttons as (icon, name)
pub const QUICK_ADD_ITEMS: [(&str, &str); 4] = [
    ("🥛", "Milk"),
    ("🥚", "Eggs"),
    ("🧀", "Cheese"),
    ("🥗", "Salad"),
];

// =============================================================================
// VIEW MESSAGES
// =============================================================================

pub const MESSAGE_STORE_EMPTY: &str = "Fridge is empty 🕸️";
pub const MESSAGE_NO_MATCHES: &str = "No items match your search";
