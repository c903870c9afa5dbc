//! Portfolio page content
//!
//! Content is authored as TOML (see `folio page --template`) and turned into
//! a [`Document`] with the class names the page behaviors and the stylesheet
//! agree on.

use super::document::{Document, ElementId, ElementSpec};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ContentError {
    #[error("cannot read page file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid page file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("duplicate section id `{0}`")]
    DuplicateSection(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioContent {
    /// Brand text on the left of the header
    pub title: String,
    #[serde(default)]
    pub footer: Option<String>,
    #[serde(default)]
    pub nav: Vec<NavItem>,
    pub hero: Hero,
    #[serde(default)]
    pub sections: Vec<Section>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NavItem {
    pub label: String,
    /// In-page fragment (`#works`) or an external URL
    pub href: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hero {
    pub catchcopy: String,
    pub name: String,
    /// Alt text shown inside the profile image frame
    #[serde(default = "default_image_alt")]
    pub image_alt: String,
}

fn default_image_alt() -> String {
    "profile".to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub paragraphs: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub cards: Vec<WorkCard>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkCard {
    pub title: String,
    pub description: String,
}

/// Handles to the structural elements created for the content
#[derive(Debug, Clone)]
pub struct PageElements {
    pub header: ElementId,
    pub hero: ElementId,
    pub sections: Vec<ElementId>,
}

impl PortfolioContent {
    /// Load content from a TOML file
    pub fn load(path: &Path) -> Result<Self, ContentError> {
        let text = std::fs::read_to_string(path).map_err(|source| ContentError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let content: Self = toml::from_str(&text).map_err(|source| ContentError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        content.validate()?;
        Ok(content)
    }

    fn validate(&self) -> Result<(), ContentError> {
        let mut seen = std::collections::HashSet::new();
        for section in &self.sections {
            if !seen.insert(section.id.as_str()) {
                return Err(ContentError::DuplicateSection(section.id.clone()));
            }
        }
        Ok(())
    }

    /// Serialize to TOML (page template)
    pub fn to_toml(&self) -> String {
        toml::to_string_pretty(self).unwrap_or_default()
    }

    /// Build the element tree under `doc.body()`
    pub fn build(&self, doc: &mut Document) -> PageElements {
        let body = doc.body();

        let header = doc.append(body, ElementSpec::new("header").class("header"));
        doc.append(header, ElementSpec::new("div").class("logo").text(&self.title));
        let nav = doc.append(header, ElementSpec::new("nav").class("nav"));
        for item in &self.nav {
            doc.append(
                nav,
                ElementSpec::new("a")
                    .class("nav-link")
                    .attr("href", &item.href)
                    .text(&item.label),
            );
        }

        let main = doc.append(body, ElementSpec::new("main"));
        let hero = doc.append(main, ElementSpec::new("section").id("home").class("hero"));
        let hero_content = doc.append(hero, ElementSpec::new("div").class("hero-content"));
        doc.append(
            hero_content,
            ElementSpec::new("p")
                .class("hero-catchcopy")
                .text(&self.hero.catchcopy),
        );
        doc.append(
            hero_content,
            ElementSpec::new("h1").class("hero-name").text(&self.hero.name),
        );
        doc.append(
            hero,
            ElementSpec::new("img")
                .class("profile-image")
                .attr("alt", &self.hero.image_alt),
        );

        let mut sections = Vec::with_capacity(self.sections.len());
        for section in &self.sections {
            let el = doc.append(
                main,
                ElementSpec::new("section").id(&section.id).class("section"),
            );
            doc.append(
                el,
                ElementSpec::new("h2").class("section-title").text(&section.title),
            );
            for paragraph in &section.paragraphs {
                doc.append(el, ElementSpec::new("p").text(paragraph));
            }
            if !section.cards.is_empty() {
                let grid = doc.append(el, ElementSpec::new("div").class("works-grid"));
                for card in &section.cards {
                    let card_el = doc.append(grid, ElementSpec::new("div").class("work-card"));
                    doc.append(
                        card_el,
                        ElementSpec::new("h3").class("work-title").text(&card.title),
                    );
                    doc.append(
                        card_el,
                        ElementSpec::new("p")
                            .class("work-description")
                            .text(&card.description),
                    );
                }
            }
            if !section.tags.is_empty() {
                let tags = doc.append(el, ElementSpec::new("div").class("experience-tags"));
                for tag in &section.tags {
                    doc.append(
                        tags,
                        ElementSpec::new("span").class("experience-tag").text(tag),
                    );
                }
            }
            sections.push(el);
        }

        if let Some(footer) = &self.footer {
            let el = doc.append(body, ElementSpec::new("footer").class("footer"));
            doc.append(el, ElementSpec::new("p").text(footer));
        }

        PageElements {
            header,
            hero,
            sections,
        }
    }
}

impl Default for PortfolioContent {
    fn default() -> Self {
        let nav = |label: &str, href: &str| NavItem {
            label: label.to_string(),
            href: href.to_string(),
        };
        let card = |title: &str, description: &str| WorkCard {
            title: title.to_string(),
            description: description.to_string(),
        };
        Self {
            title: "Portfolio".to_string(),
            nav: vec![
                nav("About", "#about"),
                nav("Works", "#works"),
                nav("Experience", "#experience"),
                nav("Contact", "#contact"),
            ],
            hero: Hero {
                catchcopy: "Building calm, fast software one small tool at a time.".to_string(),
                name: "Taro Yamada".to_string(),
                image_alt: "profile".to_string(),
            },
            sections: vec![
                Section {
                    id: "about".to_string(),
                    title: "About".to_string(),
                    paragraphs: vec![
                        "Software engineer working on developer tooling, terminal interfaces \
                         and the occasional web page."
                            .to_string(),
                        "I like small programs that do one thing well and explain \
                         themselves when they fail."
                            .to_string(),
                    ],
                    cards: Vec::new(),
                    tags: Vec::new(),
                },
                Section {
                    id: "works".to_string(),
                    title: "Works".to_string(),
                    paragraphs: Vec::new(),
                    cards: vec![
                        card(
                            "Log Lens",
                            "A terminal viewer for structured logs with live filtering.",
                        ),
                        card(
                            "Tide Table",
                            "Offline tide predictions for small harbours, rendered as text.",
                        ),
                        card(
                            "Paper Trail",
                            "Reproducible build notes generated from shell history.",
                        ),
                        card(
                            "Quiet Hours",
                            "A notification scheduler that respects time zones and weekends.",
                        ),
                    ],
                    tags: Vec::new(),
                },
                Section {
                    id: "experience".to_string(),
                    title: "Experience".to_string(),
                    paragraphs: vec![
                        "Languages and tools I have shipped production work with.".to_string(),
                    ],
                    cards: Vec::new(),
                    tags: [
                        "Rust",
                        "TypeScript",
                        "Python",
                        "SQL",
                        "Linux",
                        "Docker",
                        "Kubernetes",
                        "PostgreSQL",
                        "Redis",
                        "gRPC",
                        "CI/CD",
                        "Observability",
                    ]
                    .iter()
                    .map(|t| t.to_string())
                    .collect(),
                },
                Section {
                    id: "contact".to_string(),
                    title: "Contact".to_string(),
                    paragraphs: vec![
                        "Mail: hello@example.com".to_string(),
                        "Always happy to talk about tools, terminals and tea.".to_string(),
                    ],
                    cards: Vec::new(),
                    tags: Vec::new(),
                },
            ],
            footer: Some("© Taro Yamada".to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_creates_contract_classes() {
        let mut doc = Document::new();
        let page = PortfolioContent::default().build(&mut doc);

        assert_eq!(doc.query_selector(".header").unwrap(), Some(page.header));
        assert_eq!(doc.query_selector_all(".nav-link").unwrap().len(), 4);
        assert_eq!(doc.query_selector_all(".section").unwrap().len(), 4);
        assert_eq!(doc.query_selector_all(".work-card").unwrap().len(), 4);
        assert_eq!(doc.query_selector_all(".experience-tag").unwrap().len(), 12);
        assert_eq!(
            doc.query_selector_all(".hero-catchcopy, .hero-name, .profile-image")
                .unwrap()
                .len(),
            3
        );
        assert!(doc.get_element_by_id("works").is_some());
    }

    #[test]
    fn test_template_parses_back() {
        let content = PortfolioContent::default();
        let parsed: PortfolioContent = toml::from_str(&content.to_toml()).unwrap();
        assert_eq!(parsed, content);
    }

    #[test]
    fn test_duplicate_section_rejected() {
        let mut content = PortfolioContent::default();
        content.sections.push(content.sections[0].clone());
        assert!(matches!(
            content.validate(),
            Err(ContentError::DuplicateSection(id)) if id == "about"
        ));
    }

    #[test]
    fn test_load_missing_file() {
        let err = PortfolioContent::load(Path::new("/nonexistent/folio-page.toml")).unwrap_err();
        assert!(matches!(err, ContentError::Read { .. }));
    }
}
