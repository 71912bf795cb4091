//! Prompt for checklist extraction from bidding notices

/// Builds the checklist extraction prompt
pub struct PromptBuilder<'a> {
    document_text: &'a str,
}

impl<'a> PromptBuilder<'a> {
    /// Create a new prompt builder over the extracted notice text
    pub fn new(document_text: &'a str) -> Self {
        Self { document_text }
    }

    /// Build the complete extraction prompt
    pub fn build(&self) -> String {
        let mut prompt = String::with_capacity(
            EXTRACTION_INSTRUCTIONS.len() + self.document_text.len() + OUTPUT_REMINDER.len() + 8,
        );

        prompt.push_str(EXTRACTION_INSTRUCTIONS);
        prompt.push_str("\n\n");
        prompt.push_str(self.document_text);
        prompt.push_str("\n\n");
        prompt.push_str(OUTPUT_REMINDER);

        prompt
    }
}

const EXTRACTION_INSTRUCTIONS: &str = r#"Você deve extrair desse edital de licitação no contexto brasileiro quais os documentos necessários para entrar nesse edital.

Uma vez que os documentos de habilitação exigidos foram identificados e mapeados, o sistema deve gerar um checklist claro e organizado.

IMPORTANTE: Sua resposta deve ser APENAS um JSON válido, sem texto adicional, markdown ou explicações.

Formato da resposta JSON:
{
    "checklistItems": [
        {
            "name": "Nome do documento",
            "exigenceStatus": "OBRIGATORIO",
            "additionalInfo": "Informações adicionais sobre o documento",
            "possibleToAttach": true
        }
    ]
}

Regras:
1. exigenceStatus deve ser exatamente "OBRIGATORIO" ou "OPCIONAL"
2. possibleToAttach indica se é possível anexar este documento digitalmente
3. Inclua todos os documentos mencionados no edital
4. Se não encontrar documentos específicos, retorne um array vazio

Edital para análise:"#;

const OUTPUT_REMINDER: &str = "Responda APENAS com o JSON válido:";
