//! Input validation and prompt construction

use crate::parser::{EASTERN_MARKER, LOTTO_MARKER, WESTERN_MARKER};
use thiserror::Error;

/// Minimum dream length in characters; shorter input is rejected before
/// any network call is made.
pub const MIN_DREAM_CHARS: usize = 10;

/// Errors from dream-text validation. The messages are shown to the user
/// directly.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("꿈 내용을 입력해주세요.")]
    Empty,

    #[error("꿈 내용을 좀 더 자세히 적어주세요. (최소 10자)")]
    TooShort,
}

/// Validated dream text: trimmed, non-empty, at least 10 characters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DreamText(String);

impl DreamText {
    pub fn new(raw: &str) -> Result<Self, ValidationError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Empty);
        }
        if trimmed.chars().count() < MIN_DREAM_CHARS {
            return Err(ValidationError::TooShort);
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Build the interpretation prompt for a validated dream.
///
/// One call asks for all three sections; the section markers here are the
/// same constants the parser looks for.
pub fn build_prompt(dream: &DreamText) -> String {
    format!(
        r#"당신은 동양과 서양의 해몽에 모두 정통한 전문가입니다. 다음 꿈을 해석해주세요.

꿈 내용: "{dream}"

반드시 아래 형식 그대로, 각 항목의 제목을 포함해서 답변해주세요:

{eastern}
(음양오행, 사주, 풍수지리, 동양 신화 등 동양의 전통적 관점에서 400자 정도로 해석)

{western}
(프로이트, 융의 분석심리학 등 서양 심리학의 관점에서 400자 정도로 해석)

{lotto}
1세트: (1~45 사이의 서로 다른 숫자 6개, 쉼표로 구분)
2세트: (위와 같은 형식)
3세트: (위와 같은 형식)
4세트: (위와 같은 형식)
5세트: (위와 같은 형식)

친근하고 이해하기 쉽게 설명해주세요."#,
        dream = dream.as_str(),
        eastern = EASTERN_MARKER,
        western = WESTERN_MARKER,
        lotto = LOTTO_MARKER,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_empty_input() {
        assert_eq!(DreamText::new(""), Err(ValidationError::Empty));
        assert_eq!(DreamText::new("   \n "), Err(ValidationError::Empty));
    }

    #[test]
    fn test_rejects_short_input() {
        assert_eq!(DreamText::new("용꿈"), Err(ValidationError::TooShort));
        assert_eq!(DreamText::new("aaaaaaaaa"), Err(ValidationError::TooShort));
    }

    #[test]
    fn test_accepts_ten_chars_and_trims() {
        let dream = DreamText::new("  하늘을 나는 꿈을 꿨다  ").unwrap();
        assert_eq!(dream.as_str(), "하늘을 나는 꿈을 꿨다");
    }

    #[test]
    fn test_prompt_embeds_dream_and_markers() {
        let dream = DreamText::new("바다에서 큰 물고기를 잡는 꿈").unwrap();
        let prompt = build_prompt(&dream);
        assert!(prompt.contains(dream.as_str()));
        assert!(prompt.contains(EASTERN_MARKER));
        assert!(prompt.contains(WESTERN_MARKER));
        assert!(prompt.contains(LOTTO_MARKER));
        assert!(prompt.contains("5세트"));
    }
}
