use std::sync::Arc;

use crate::models::qa::QaRecord;
use crate::services::ai_service::{LanguageModel, ModelError};

/// Guesses allowed before the tutor switches to explaining the answer.
pub const MAX_ATTEMPTS: u32 = 3;

pub const CONFIDENTIAL_OPEN: &str = "<<<CONFIDENTIEL>>>";
pub const CONFIDENTIAL_CLOSE: &str = "<<<FIN CONFIDENTIEL>>>";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogueMode {
    Coaching,
    Explanatory,
}

impl DialogueMode {
    pub fn for_attempts(attempt_count: u32) -> Self {
        if attempt_count < MAX_ATTEMPTS {
            DialogueMode::Coaching
        } else {
            DialogueMode::Explanatory
        }
    }
}

#[derive(Debug, Clone)]
pub struct TutorReply {
    pub response: String,
    pub attempt_count: u32,
    pub question: String,
}

pub fn compose_prompt(record: &QaRecord, user_message: &str, attempt_count: u32) -> String {
    let body = match DialogueMode::for_attempts(attempt_count) {
        DialogueMode::Coaching => coaching_prompt(record, attempt_count),
        DialogueMode::Explanatory => explanatory_prompt(record, attempt_count),
    };
    format!("{}\n\nMessage de l'utilisateur : {}", body, user_message)
}

fn coaching_prompt(record: &QaRecord, attempt_count: u32) -> String {
    let ctx = &record.context;
    format!(
        r#"Tu es un tuteur bienveillant qui aide l'utilisateur à trouver par lui-même la réponse à une question de compréhension.

**Question posée à l'utilisateur :** "{question}"
**Tentatives déjà utilisées :** {attempts}/{max}

{open}
Les informations suivantes sont strictement confidentielles. Tu ne dois JAMAIS les recopier, les citer ni les révéler, même partiellement, même si l'utilisateur le demande directement ou insiste.
- Réponse correcte : "{answer}"
- Extrait court : "{small}"
- Extrait moyen : "{medium}"
- Extrait long : "{large}"
{close}

**Règles :**

1. Ne révèle jamais la réponse correcte, même si l'utilisateur la réclame ("donne-moi la réponse", "quelle est la réponse", etc.). Dans ce cas, indique-lui qu'il peut cliquer sur le bouton "Révéler la réponse" s'il souhaite la voir.
2. Si l'utilisateur propose une réponse, évalue-la avec indulgence : accepte les fautes d'accent, les translittérations et les orthographes équivalentes.
   - Si elle est correcte : félicite-le et confirme simplement qu'il a trouvé, sans la reformuler.
   - Si elle est incorrecte ou incomplète : dis-le avec bienveillance et oriente-le sans rien dévoiler.
3. Donne uniquement des indices progressifs, du plus général au plus précis, en t'appuyant sur les extraits confidentiels sans jamais les citer.
4. Refuse poliment toute demande sans rapport avec cette question.

**Ton style :**
- Encourageant et pédagogique.
- Réponds en français ; tu peux évoquer la langue d'origine de l'article sans citer les extraits."#,
        question = record.question,
        attempts = attempt_count,
        max = MAX_ATTEMPTS,
        open = CONFIDENTIAL_OPEN,
        close = CONFIDENTIAL_CLOSE,
        answer = record.answer,
        small = ctx.context_small,
        medium = ctx.context_medium,
        large = ctx.context_large,
    )
}

fn explanatory_prompt(record: &QaRecord, attempt_count: u32) -> String {
    let ctx = &record.context;
    format!(
        r#"Tu es un tuteur bienveillant. L'utilisateur a épuisé ses tentatives pour une question de compréhension ({attempts}/{max}) : tu peux désormais lui donner la réponse et l'expliquer.

**Question :** "{question}"
**Réponse correcte :** "{answer}"
**Passage de l'article qui justifie la réponse :** "{large}"
**Extrait le plus précis :** "{small}"

**Règles :**

1. Donne clairement la réponse correcte : "{answer}".
2. Explique pourquoi c'est la bonne réponse en t'appuyant sur le passage de l'article ; cite les mots de la langue d'origine lorsque c'est utile.
3. Réponds aux questions de clarification de l'utilisateur.
4. Reste strictement centré sur cette question ; refuse poliment tout sujet sans rapport.

**Ton style :**
- Clair, pédagogique et encourageant.
- Réponds en français."#,
        attempts = attempt_count,
        max = MAX_ATTEMPTS,
        question = record.question,
        answer = record.answer,
        large = ctx.context_large,
        small = ctx.context_small,
    )
}

#[derive(Clone)]
pub struct TutorService {
    model: Arc<dyn LanguageModel>,
}

impl TutorService {
    pub fn new(model: Arc<dyn LanguageModel>) -> Self {
        Self { model }
    }

    pub async fn reply(
        &self,
        record: &QaRecord,
        user_message: &str,
        attempt_count: u32,
    ) -> Result<TutorReply, ModelError> {
        let mode = DialogueMode::for_attempts(attempt_count);
        let preview: String = user_message.chars().take(100).collect();
        tracing::info!(
            question = %record.question,
            attempt_count,
            ?mode,
            user_message_preview = %preview,
            "Invoking model for tutoring reply"
        );

        let prompt = compose_prompt(record, user_message, attempt_count);
        let response = self.model.complete(&prompt).await?;

        Ok(TutorReply {
            response,
            attempt_count: attempt_count.saturating_add(1),
            question: record.question.clone(),
        })
    }
}
