//! Page templates, compiled into the binary.

use tera::Tera;

const TEMPLATES: &[(&str, &str)] = &[
    ("base.html", include_str!("../templates/base.html")),
    ("macros.html", include_str!("../templates/macros.html")),
    ("index.html", include_str!("../templates/index.html")),
    ("post-details.html", include_str!("../templates/post-details.html")),
    ("posts-list.html", include_str!("../templates/posts-list.html")),
    ("contacts.html", include_str!("../templates/contacts.html")),
];

/// Build a Tera instance holding every page template.
pub fn load() -> Result<Tera, tera::Error> {
    let mut tera = Tera::default();
    tera.add_raw_templates(TEMPLATES.iter().copied())?;
    tracing::debug!(templates = TEMPLATES.len(), "Templates compiled");
    Ok(tera)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contacts_renders_with_empty_context() {
        let tera = load().unwrap();
        let html = tera.render("contacts.html", &tera::Context::new()).unwrap();
        assert!(html.contains("Contacts"));
    }
}
