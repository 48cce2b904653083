//! User-visible strings in the supported display languages.

use serde::{Deserialize, Serialize};

use crate::selector::RotationStrategy;

/// Display language for synthesized messages and labels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Locale {
    /// Traditional Chinese, the service's native language
    #[default]
    #[serde(rename = "zh-TW", alias = "zh_tw", alias = "zh")]
    ZhTw,
    #[serde(rename = "en", alias = "en-US")]
    En,
}

impl Locale {
    /// Parse a locale tag, case-insensitive
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().replace('_', "-").as_str() {
            "zh-tw" | "zh" | "zh-hant" => Some(Self::ZhTw),
            "en" | "en-us" | "en-gb" => Some(Self::En),
            _ => None,
        }
    }

    /// Assistant text for a reply that carried `success: false`
    pub fn application_error(&self, detail: &str) -> String {
        match self {
            Self::ZhTw => format!("抱歉，發生了錯誤：{}", detail),
            Self::En => format!("Sorry, an error occurred: {}", detail),
        }
    }

    /// Assistant text for a request that never produced a usable reply
    pub fn transport_error(&self, detail: &str) -> String {
        match self {
            Self::ZhTw => format!("抱歉，無法連接到服務器：{}", detail),
            Self::En => format!("Sorry, could not reach the server: {}", detail),
        }
    }

    pub fn strategy_label(&self, strategy: &RotationStrategy) -> String {
        match (self, strategy) {
            (Self::ZhTw, RotationStrategy::RoundRobin) => "輪詢策略".to_string(),
            (Self::ZhTw, RotationStrategy::Random) => "隨機策略".to_string(),
            (Self::ZhTw, RotationStrategy::Weighted) => "權重策略".to_string(),
            (Self::En, RotationStrategy::RoundRobin) => "Round-robin".to_string(),
            (Self::En, RotationStrategy::Random) => "Random".to_string(),
            (Self::En, RotationStrategy::Weighted) => "Weighted".to_string(),
            (_, RotationStrategy::Other(raw)) => raw.clone(),
        }
    }

    pub fn greeting(&self) -> &'static str {
        match self {
            Self::ZhTw => "您好！我是您的 AI 秘書，很高興為您服務。我可以幫助您管理日程、處理任務、搜索記憶等。請問有什麼可以幫助您的嗎？",
            Self::En => "Hello! I'm your AI secretary. I can help you manage your schedule, handle tasks and search your memories. What can I do for you?",
        }
    }

    pub fn thinking(&self) -> &'static str {
        match self {
            Self::ZhTw => "正在思考中...",
            Self::En => "Thinking...",
        }
    }

    pub fn input_placeholder(&self) -> &'static str {
        match self {
            Self::ZhTw => "輸入您的消息...",
            Self::En => "Type your message...",
        }
    }

    pub fn memory_hint(&self) -> &'static str {
        match self {
            Self::ZhTw => "輸入 '[記住] 內容' 來明確標記重要資訊",
            Self::En => "Type '[記住] text' to explicitly mark something to remember",
        }
    }

    pub fn strategy_caption(&self) -> &'static str {
        match self {
            Self::ZhTw => "當前策略",
            Self::En => "Strategy",
        }
    }

    pub fn keys_caption(&self) -> &'static str {
        match self {
            Self::ZhTw => "可用密鑰",
            Self::En => "Keys",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_texts_embed_detail() {
        assert!(Locale::ZhTw.application_error("quota exceeded").contains("quota exceeded"));
        assert!(Locale::En.transport_error("timeout").contains("timeout"));
        assert_ne!(
            Locale::En.application_error("x"),
            Locale::En.transport_error("x")
        );
    }

    #[test]
    fn test_strategy_labels() {
        assert_eq!(Locale::En.strategy_label(&RotationStrategy::RoundRobin), "Round-robin");
        assert_eq!(Locale::ZhTw.strategy_label(&RotationStrategy::Weighted), "權重策略");
        assert_eq!(
            Locale::ZhTw.strategy_label(&RotationStrategy::Other("least-used".into())),
            "least-used"
        );
    }

    #[test]
    fn test_locale_from_str() {
        assert_eq!(Locale::from_str("zh_TW"), Some(Locale::ZhTw));
        assert_eq!(Locale::from_str("EN"), Some(Locale::En));
        assert_eq!(Locale::from_str("fr"), None);
    }
}
