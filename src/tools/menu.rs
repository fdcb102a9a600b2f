//! Party menu suggestion tool.

use async_trait::async_trait;
use serde_json::{json, Value};

use super::Tool;

/// Suggest a menu based on the occasion.
pub struct SuggestMenu;

#[async_trait]
impl Tool for SuggestMenu {
    fn name(&self) -> &str {
        "suggest_menu"
    }

    fn description(&self) -> &str {
        "Suggests a menu based on the occasion. Supported occasions: casual, formal, superhero or other. Default is a custom menu."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "occasion": {
                    "type": "string",
                    "description": "The type of occasion for the party"
                }
            },
            "required": ["occasion"]
        })
    }

    async fn execute(&self, args: Value) -> anyhow::Result<String> {
        let occasion = args["occasion"]
            .as_str()
            .ok_or_else(|| anyhow::anyhow!("Missing 'occasion' argument"))?;

        let menu = match occasion {
            "casual" => "Pizza, snacks, and drinks.",
            "formal" => "3-course dinner with wine and dessert.",
            "superhero" => "Buffet with high-energy and healthy food.",
            _ => "Custom menu for the butler.",
        };
        Ok(menu.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn known_occasions_have_fixed_menus() {
        let tool = SuggestMenu;
        let formal = tool
            .execute(json!({"occasion": "formal"}))
            .await
            .unwrap();
        assert_eq!(formal, "3-course dinner with wine and dessert.");

        let other = tool
            .execute(json!({"occasion": "birthday"}))
            .await
            .unwrap();
        assert_eq!(other, "Custom menu for the butler.");
    }

    #[tokio::test]
    async fn missing_occasion_is_an_error() {
        let err = SuggestMenu.execute(json!({})).await.unwrap_err();
        assert!(err.to_string().contains("occasion"));
    }
}
