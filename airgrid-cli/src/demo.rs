//! Built-in sample data for `--source demo`.

use airgrid_lib::model::Record;

/// (id, name, category, description, website)
const ROWS: &[(&str, &str, &str, &str, &str)] = &[
    ("openai", "OpenAI API", "AI", "Access GPT models for text, vision, and embeddings.", "https://platform.openai.com"),
    ("anthropic", "Anthropic Claude API", "AI", "Claude conversational AI models.", "https://www.anthropic.com"),
    ("stabilityai", "Stability AI API", "AI", "Text-to-image generation (Stable Diffusion).", "https://platform.stability.ai"),
    ("replicate", "Replicate API", "AI", "Run open-source AI models via API.", "https://replicate.com"),
    ("huggingface", "Hugging Face Inference", "AI", "Host and call ML models with REST API.", "https://huggingface.co/inference"),
    ("pinecone", "Pinecone", "Vector DB", "Vector database for semantic search and RAG.", "https://www.pinecone.io"),
    ("weaviate", "Weaviate", "Vector DB", "Open-source vector search engine.", "https://weaviate.io"),
    ("qdrant", "Qdrant", "Vector DB", "High-performance vector database.", "https://qdrant.tech"),
    ("cohere", "Cohere API", "AI", "Text generation and embeddings.", "https://cohere.com"),
    ("ai21", "AI21 Studio API", "AI", "Language models for text tasks.", "https://www.ai21.com/studio"),
    ("googleai", "Google Gemini API", "AI", "Google's multimodal Gemini models.", "https://ai.google.dev"),
    ("mistral", "Mistral API", "AI", "Efficient open-weight LLMs with hosted API.", "https://mistral.ai"),
    ("groq", "Groq API", "AI Infra", "Ultra-fast inference on Groq hardware.", "https://groq.com"),
    ("assemblyai", "AssemblyAI API", "Speech", "Speech-to-text and audio AI.", "https://www.assemblyai.com"),
    ("deepgram", "Deepgram API", "Speech", "Speech recognition and transcription.", "https://deepgram.com"),
    ("elevenlabs", "ElevenLabs API", "Speech", "Text-to-speech voices.", "https://elevenlabs.io"),
    ("twilio", "Twilio API", "Comms", "SMS, voice, and WhatsApp APIs.", "https://www.twilio.com"),
    ("stripe", "Stripe API", "Payments", "Payments, billing, and checkout.", "https://stripe.com"),
    ("notion", "Notion API", "Productivity", "Integrate with Notion workspaces.", "https://developers.notion.com"),
    ("slack", "Slack API", "Productivity", "Build apps and bots for Slack.", "https://api.slack.com"),
    ("openai_inc", "OpenAI", "AI Company", "Makers of ChatGPT and GPT models.", "https://openai.com"),
    ("anthropic_inc", "Anthropic", "AI Company", "Creators of Claude AI.", "https://www.anthropic.com"),
    ("stability_inc", "Stability AI", "AI Company", "Makers of Stable Diffusion.", "https://stability.ai"),
    ("huggingface_inc", "Hugging Face", "AI Company", "Community and platform for ML models.", "https://huggingface.co"),
    ("cohere_inc", "Cohere", "AI Company", "Language models for enterprise.", "https://cohere.com"),
    ("ai21_inc", "AI21 Labs", "AI Company", "NLP research and APIs.", "https://www.ai21.com"),
    ("googleai_inc", "Google DeepMind", "AI Company", "Pioneering AI research and Gemini.", "https://deepmind.google"),
    ("mistral_inc", "Mistral AI", "AI Company", "Open-weight models and APIs.", "https://mistral.ai"),
    ("perplexity_inc", "Perplexity AI", "AI Company", "AI-powered search engine.", "https://perplexity.ai"),
    ("runway_inc", "Runway", "AI Company", "Creative AI tools for video and image.", "https://runwayml.com"),
    ("midjourney_inc", "MidJourney", "AI Company", "Independent AI art lab.", "https://www.midjourney.com"),
    ("characterai_inc", "Character.AI", "AI Company", "AI chat characters platform.", "https://character.ai"),
    ("replit_inc", "Replit", "DevTools", "Collaborative coding + AI tools.", "https://replit.com"),
    ("databricks_inc", "Databricks", "Data + AI", "Data lakehouse with AI tooling.", "https://databricks.com"),
    ("snowflake_inc", "Snowflake", "Data + AI", "Cloud data warehouse + AI integrations.", "https://snowflake.com"),
    ("nvidia_inc", "NVIDIA", "AI Hardware", "GPUs powering AI workloads.", "https://nvidia.com"),
    ("intel_inc", "Intel", "AI Hardware", "AI accelerators and CPUs.", "https://intel.com"),
    ("meta_inc", "Meta AI", "AI Research", "Makers of LLaMA models.", "https://ai.meta.com"),
    ("microsoft_inc", "Microsoft AI", "AI Company", "Azure AI + Copilot integrations.", "https://azure.microsoft.com"),
    ("amazon_inc", "AWS AI", "AI Company", "AI and ML services on AWS.", "https://aws.amazon.com/ai"),
];

/// Field the demo provider searches and orders by.
pub(crate) const MATCH_FIELD: &str = "name";

pub(crate) fn records() -> Vec<Record> {
    ROWS.iter()
        .map(|&(id, name, category, description, website)| {
            Record::new(id)
                .set("name", name)
                .set("category", category)
                .set("description", description)
                .set("website", website)
        })
        .collect()
}
