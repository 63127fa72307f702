use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NavLink {
    pub label: String,
    pub href: String,
    pub active: bool,
}

impl NavLink {
    pub fn new(label: impl Into<String>, href: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            href: href.into(),
            active: false,
        }
    }
}

/// Main menu of the loan application.
pub fn default_links() -> Vec<NavLink> {
    vec![
        NavLink::new("Accueil", "/"),
        NavLink::new("Nouveau prêt", "/nouveau-pret"),
        NavLink::new("Retours", "/retour"),
        NavLink::new("Recherche", "/recherche"),
        NavLink::new("Personnes", "/personnes"),
        NavLink::new("Inventaire", "/inventaire"),
        NavLink::new("Historique", "/historique"),
    ]
}

fn normalize(path: &str) -> &str {
    match path.trim_end_matches('/') {
        "" => "/",
        trimmed => trimmed,
    }
}

/// Exact path match, ignoring a trailing slash. The root only matches itself.
pub fn is_active(href: &str, current_path: &str) -> bool {
    normalize(href) == normalize(current_path)
}

pub fn mark_active(links: &mut [NavLink], current_path: &str) {
    for link in links {
        link.active = is_active(&link.href, current_path);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trailing_slash_is_ignored() {
        assert!(is_active("/nouveau-pret", "/nouveau-pret/"));
        assert!(is_active("/personnes/", "/personnes"));
    }

    #[test]
    fn test_root_only_matches_root() {
        assert!(is_active("/", "/"));
        assert!(!is_active("/", "/personnes"));
        assert!(!is_active("/personnes", "/"));
    }

    #[test]
    fn test_prefix_is_not_a_match() {
        assert!(!is_active("/personnes", "/personnes/ajouter"));
    }

    #[test]
    fn test_mark_active_flags_one_link() {
        let mut links = default_links();
        mark_active(&mut links, "/nouveau-pret");
        let active: Vec<&str> = links
            .iter()
            .filter(|l| l.active)
            .map(|l| l.href.as_str())
            .collect();
        assert_eq!(active, vec!["/nouveau-pret"]);
    }
}
