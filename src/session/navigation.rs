use serde::Serialize;

use super::context::SessionUser;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MenuItem {
    pub name: &'static str,
    pub href: &'static str,
}

const BASE_MENU: [MenuItem; 3] = [
    MenuItem { name: "Home", href: "/dashboard" },
    MenuItem { name: "Recipients", href: "/dashboard/recipients" },
    MenuItem { name: "Custom Games", href: "/dashboard/custom-games" },
];

const ADMIN_MENU: [MenuItem; 1] = [MenuItem { name: "Main Games", href: "/dashboard/main-games" }];

/// Sidebar entries; main game authoring is only offered to admins
pub fn menu_items(user: Option<&SessionUser>) -> Vec<MenuItem> {
    let mut items = BASE_MENU.to_vec();
    if user.map_or(false, SessionUser::is_admin) {
        items.extend(ADMIN_MENU);
    }
    items
}

pub fn display_name(user: Option<&SessionUser>) -> String {
    match user {
        None => "Guest".to_string(),
        Some(user) if !user.name.is_empty() => user.name.clone(),
        Some(user) if !user.email.is_empty() => user.email.clone(),
        Some(_) => "Unknown User".to_string(),
    }
}

/// Up to two uppercase initials from the words of a name
pub fn initials(name: &str) -> String {
    name.split_whitespace()
        .filter_map(|word| word.chars().next())
        .flat_map(char::to_uppercase)
        .take(2)
        .collect()
}
