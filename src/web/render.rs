//! Page rendering.
//!
//! The page template is embedded at compile time and rendered with minijinja, which
//! HTML-escapes every interpolated value since the template name ends in `.html`.

use crate::catalog::Catalog;
use crate::chat::ChatLoop;
use crate::error::Result;
use crate::llm::models::LlmMessage;
use minijinja::{context, Environment};
use serde::Serialize;

const PAGE_TEMPLATE_NAME: &str = "page.html";
const PAGE_TEMPLATE: &str = include_str!("templates/page.html");

#[derive(Debug, Serialize)]
struct LodgingOption {
    label: String,
    selected: bool,
}

pub struct PageRenderer {
    env: Environment<'static>,
}

impl PageRenderer {
    pub fn new() -> Result<Self> {
        let mut env = Environment::new();
        env.add_template(PAGE_TEMPLATE_NAME, PAGE_TEMPLATE)?;
        Ok(Self { env })
    }

    /// Render the picker and the whole display log, oldest message first.
    pub fn render_chat(&self, catalog: &Catalog, chat: &ChatLoop) -> Result<String> {
        let selected_id = chat.selected().map(|l| l.id());
        let options: Vec<LodgingOption> = catalog
            .iter()
            .map(|lodging| LodgingOption {
                label: lodging.label(),
                selected: Some(lodging.id()) == selected_id,
            })
            .collect();
        let transcript: &[LlmMessage] = chat.display_log();

        let template = self.env.get_template(PAGE_TEMPLATE_NAME)?;
        Ok(template.render(context! { options, transcript })?)
    }

    /// Static page shown when the catalog cannot be loaded.
    pub fn render_catalog_error(&self, message: &str) -> Result<String> {
        let template = self.env.get_template(PAGE_TEMPLATE_NAME)?;
        Ok(template.render(context! { catalog_error => message })?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::broker::LlmBroker;
    use crate::llm::gateway::LlmGateway;
    use std::sync::Arc;

    struct EchoGateway;

    #[async_trait::async_trait]
    impl LlmGateway for EchoGateway {
        async fn complete(&self, _model: &str, messages: &[LlmMessage]) -> Result<String> {
            Ok(format!("écho : {}", messages.last().map(|m| m.content.as_str()).unwrap_or("")))
        }
    }

    fn catalog() -> Catalog {
        Catalog::from_json_str(
            r#"{"logements": [{"id": "1", "nom": "Appartement Centre"}, {"id": "2", "nom": "Studio <Gare>"}]}"#,
        )
        .unwrap()
    }

    #[test]
    fn test_render_lists_every_option() {
        let renderer = PageRenderer::new().unwrap();
        let catalog = catalog();
        let mut chat = ChatLoop::default();
        chat.select(&catalog, "1 - Appartement Centre").unwrap();

        let html = renderer.render_chat(&catalog, &chat).unwrap();

        assert_eq!(html.matches("<option ").count(), catalog.len());
        assert!(html.contains(r#"<option value="1 - Appartement Centre" selected>"#));
        assert!(html.contains("Studio &lt;Gare&gt;"));
        assert!(!html.contains("Studio <Gare>"));
    }

    #[tokio::test]
    async fn test_render_transcript_in_order() {
        let renderer = PageRenderer::new().unwrap();
        let catalog = catalog();
        let broker = LlmBroker::new("m", Arc::new(EchoGateway));
        let mut chat = ChatLoop::default();
        chat.select(&catalog, "1 - Appartement Centre").unwrap();
        chat.submit(&broker, "première").await.unwrap();
        chat.submit(&broker, "<b>seconde</b>").await.unwrap();

        let html = renderer.render_chat(&catalog, &chat).unwrap();

        let first = html.find("première").unwrap();
        let second = html.find("seconde").unwrap();
        assert!(first < second);
        assert_eq!(html.matches("class=\"message user\"").count(), 2);
        assert_eq!(html.matches("class=\"message assistant\"").count(), 2);
        assert!(html.contains("&lt;b&gt;seconde"));
        assert!(!html.contains("<b>seconde"));
        assert!(!html.contains("Tu es une assistante"));
    }

    #[test]
    fn test_render_catalog_error_page() {
        let renderer = PageRenderer::new().unwrap();

        let html = renderer.render_catalog_error("Catalog not found: logements.json").unwrap();

        assert!(html.contains(
            "Erreur lors du chargement des logements : Catalog not found: logements.json"
        ));
        assert!(!html.contains("<select"));
        assert!(!html.contains("action=\"/chat\""));
    }
}
