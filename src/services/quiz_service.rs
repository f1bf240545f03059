use std::sync::{Arc, LazyLock};

use jsonschema::JSONSchema;
use serde_json::Value as JsonValue;
use validator::Validate;

use crate::models::qa::{QaList, QUIZ_ITEM_COUNT};
use crate::services::ai_service::{LanguageModel, ModelError, OutputSchema};
use crate::utils::validation::{compile_schema, schema_violations};

const QUIZ_PROMPT: &str = r#"Tu es un assistant IA spécialisé dans la création d'exercices de compréhension. Ton rôle est de transformer un article fourni en une série de questions-réponses pour tester la compréhension d'un utilisateur francophone.

**Instructions :**

1. L'article fourni peut être dans n'importe quelle langue, le plus souvent une langue étrangère.
2. Crée **exactement 10 éléments question-réponse-contexte** basés sur l'article.
3. Pour chaque élément :
   * Fournis **la question en français**, quelle que soit la langue de l'article.
   * Fournis **la réponse en français**.
   * Fournis **trois extraits imbriqués de l'article**, dans la langue d'origine, sans traduction :
     - `contextLarge` : un passage large (plusieurs phrases) qui justifie la réponse ;
     - `contextMedium` : une portion de `contextLarge`, copiée mot pour mot, qui justifie encore la réponse ;
     - `contextSmall` : une portion de `contextMedium`, copiée mot pour mot, la plus courte possible qui contient encore la réponse.
   * Règle stricte : `contextSmall` doit apparaître tel quel dans `contextMedium`, et `contextMedium` doit apparaître tel quel dans `contextLarge`. Chacun des trois extraits doit, à lui seul, contenir la réponse.
4. Inclue **1 à 3 questions sur la langue de l'article** : la signification de mots ou de phrases difficiles, ou le temps, le mode ou la déclinaison de certains mots.
5. Ne pose des questions que sur des informations réellement présentes dans l'article.
6. Les questions sur la langue doivent citer le mot ou la phrase cible dans la langue originale et en expliquer la signification en français.
7. Les passages cités restent toujours dans la langue originale de l'article.

**Exemples :**

* Si l'article parle de Paris : crée des questions comme "Qu'est-ce que Paris ?" ou "Pourquoi Paris est-elle célèbre ?" uniquement si ces informations apparaissent dans l'article, avec les passages originaux comme contexte.
* Si l'article est en russe : toutes les questions sont en français, mais 1 à 3 d'entre elles portent sur des mots ou des tournures russes difficiles, avec le passage original correspondant."#;

const QA_LIST_SCHEMA_NAME: &str = "qa_list";

pub fn qa_list_schema() -> JsonValue {
    let text = serde_json::json!({ "type": "string" });
    serde_json::json!({
        "type": "object",
        "additionalProperties": false,
        "required": ["items"],
        "properties": {
            "items": {
                "type": "array",
                "minItems": QUIZ_ITEM_COUNT,
                "maxItems": QUIZ_ITEM_COUNT,
                "items": {
                    "type": "object",
                    "additionalProperties": false,
                    "required": ["question", "answer", "context"],
                    "properties": {
                        "question": text,
                        "answer": text,
                        "context": {
                            "type": "object",
                            "additionalProperties": false,
                            "required": ["contextLarge", "contextMedium", "contextSmall"],
                            "properties": {
                                "contextLarge": text,
                                "contextMedium": text,
                                "contextSmall": text
                            }
                        }
                    }
                }
            }
        }
    })
}

static QA_LIST_VALIDATOR: LazyLock<Result<JSONSchema, String>> =
    LazyLock::new(|| compile_schema(&qa_list_schema()));

#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    #[error(transparent)]
    Model(#[from] ModelError),

    #[error("qa list schema failed to compile: {0}")]
    SchemaCompile(String),

    #[error("generated quiz is malformed: {0}")]
    Malformed(String),
}

pub fn compose_prompt(article: &str) -> String {
    format!("{}\n\nArticle: {}", QUIZ_PROMPT, article)
}

#[derive(Clone)]
pub struct QuizService {
    model: Arc<dyn LanguageModel>,
}

impl QuizService {
    pub fn new(model: Arc<dyn LanguageModel>) -> Self {
        Self { model }
    }

    pub async fn generate(&self, article: &str) -> Result<QaList, GenerationError> {
        let schema = OutputSchema {
            name: QA_LIST_SCHEMA_NAME,
            schema: qa_list_schema(),
        };

        let preview: String = article.chars().take(100).collect();
        tracing::info!(article_preview = %preview, "Invoking model for quiz generation");

        let raw = self
            .model
            .complete_structured(&compose_prompt(article), &schema)
            .await?;

        let list = parse_qa_list(raw)?;

        for (idx, item) in list.items.iter().enumerate() {
            if !item.context.is_nested() {
                tracing::warn!(item = idx, "Generated context excerpts are not nested");
            }
        }

        tracing::info!(qa_count = list.items.len(), "Quiz generated");
        Ok(list)
    }
}

/// Validates a raw model reply against the QA list schema, then decodes it.
pub fn parse_qa_list(raw: JsonValue) -> Result<QaList, GenerationError> {
    let validator = QA_LIST_VALIDATOR
        .as_ref()
        .map_err(|e| GenerationError::SchemaCompile(e.clone()))?;

    let violations = schema_violations(validator, &raw);
    if !violations.is_empty() {
        return Err(ModelError::SchemaViolation(violations).into());
    }

    let list: QaList =
        serde_json::from_value(raw).map_err(|e| GenerationError::Malformed(e.to_string()))?;
    list.validate()
        .map_err(|e| GenerationError::Malformed(e.to_string()))?;
    Ok(list)
}
