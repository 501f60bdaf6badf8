use crate::catalog::Lodging;
use crate::error::Result;

/// Assistant persona. The catalog is French, so the assistant answers in French only.
pub const PERSONA: &str = "Tu es une assistante IA professionnelle et chaleureuse. \
Tu aides les voyageurs concernant leur logement, leur donnant des renseignements clairs et réconfortants. \
Si tu ne sais pas répondre, redirige-les vers le propriétaire. \
Réponds uniquement en français. Voici les infos du logement :\n";

/// System prompt grounding the assistant on one lodging: persona, then the full record.
pub fn system_prompt(lodging: &Lodging) -> Result<String> {
    Ok(format!("{}{}", PERSONA, lodging.to_pretty_json()?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Map, Value};

    fn lodging(raw: &str) -> Lodging {
        let fields: Map<String, Value> = serde_json::from_str(raw).unwrap();
        Lodging::from_fields(fields).unwrap()
    }

    #[test]
    fn test_prompt_starts_with_persona() {
        let prompt = system_prompt(&lodging(r#"{"id": "1", "nom": "Appartement Centre"}"#)).unwrap();

        assert!(prompt.starts_with("Tu es une assistante IA professionnelle et chaleureuse. Tu aides"));
        assert!(prompt.contains("redirige-les vers le propriétaire"));
        assert!(prompt.contains("Réponds uniquement en français."));
    }

    #[test]
    fn test_prompt_embeds_record() {
        let prompt = system_prompt(&lodging(r#"{"id": "1", "nom": "Appartement Centre"}"#)).unwrap();

        assert!(prompt.contains("\"id\": \"1\""));
        assert!(prompt.contains("Appartement Centre"));
        assert!(prompt.ends_with("Voici les infos du logement :\n{\n  \"id\": \"1\",\n  \"nom\": \"Appartement Centre\"\n}"));
    }

    #[test]
    fn test_prompt_reproduces_every_field() {
        let record = lodging(
            r#"{"id": "3", "nom": "Maison Mer", "wifi": {"reseau": "Mer", "code": "abc"}, "arrivee": "16h", "equipements": ["lave-linge", "four"]}"#,
        );

        let prompt = system_prompt(&record).unwrap();
        let embedded = prompt.strip_prefix(PERSONA).unwrap();
        let reparsed: Map<String, Value> = serde_json::from_str(embedded).unwrap();

        assert_eq!(&reparsed, record.fields());
        assert_eq!(
            reparsed.keys().collect::<Vec<_>>(),
            record.fields().keys().collect::<Vec<_>>()
        );
    }
}
