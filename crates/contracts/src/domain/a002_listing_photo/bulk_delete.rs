use serde::{Deserialize, Deserializer, Serialize};

/// Запрос массового удаления фотографий объекта.
///
/// Отправляется как `application/x-www-form-urlencoded`:
/// `property_id=<id>&ids[]=<id>&ids[]=<id>...`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulkDeleteRequest {
    pub property_id: String,
    pub ids: Vec<String>,
}

impl BulkDeleteRequest {
    pub const PROPERTY_FIELD: &'static str = "property_id";
    pub const IDS_FIELD: &'static str = "ids[]";

    pub fn new(property_id: impl Into<String>, ids: Vec<String>) -> Self {
        Self {
            property_id: property_id.into(),
            ids,
        }
    }

    /// Поля формы в порядке отправки
    pub fn form_fields(&self) -> Vec<(&'static str, &str)> {
        let mut fields = Vec::with_capacity(self.ids.len() + 1);
        fields.push((Self::PROPERTY_FIELD, self.property_id.as_str()));
        fields.extend(self.ids.iter().map(|id| (Self::IDS_FIELD, id.as_str())));
        fields
    }
}

/// Успешный ответ: только те id, которые сервер действительно удалил
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulkDeleteResponse {
    #[serde(default, deserialize_with = "deserialize_ids")]
    pub deleted: Vec<String>,
}

/// Тело ответа при ошибке (`{"error": "forbidden"}`)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulkDeleteErrorBody {
    #[serde(default)]
    pub error: Option<String>,
}

impl BulkDeleteErrorBody {
    pub const UNKNOWN: &'static str = "unknown";

    /// Код ошибки из тела ответа; нечитаемое тело даёт `"unknown"`
    pub fn code_from(body: &str) -> String {
        serde_json::from_str::<BulkDeleteErrorBody>(body)
            .ok()
            .and_then(|parsed| parsed.error)
            .filter(|code| !code.trim().is_empty())
            .unwrap_or_else(|| Self::UNKNOWN.to_string())
    }
}

/// Сервер отдаёт числовые первичные ключи, в разметке id — строки
#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Number(i64),
    Text(String),
}

fn deserialize_ids<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Vec<RawId>>::deserialize(deserializer)?;
    Ok(raw
        .unwrap_or_default()
        .into_iter()
        .map(|id| match id {
            RawId::Number(n) => n.to_string(),
            RawId::Text(s) => s,
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_form_fields_repeat_ids() {
        let request = BulkDeleteRequest::new("42", vec!["1".into(), "3".into()]);
        assert_eq!(
            request.form_fields(),
            vec![("property_id", "42"), ("ids[]", "1"), ("ids[]", "3")]
        );
    }

    #[test]
    fn test_response_accepts_numeric_and_text_ids() {
        let response: BulkDeleteResponse =
            serde_json::from_str(r#"{"deleted": [1, "3", 17]}"#).unwrap();
        assert_eq!(response.deleted, vec!["1", "3", "17"]);
    }

    #[test]
    fn test_response_without_deleted_is_empty() {
        let response: BulkDeleteResponse = serde_json::from_str("{}").unwrap();
        assert!(response.deleted.is_empty());
        let response: BulkDeleteResponse = serde_json::from_str(r#"{"deleted": null}"#).unwrap();
        assert!(response.deleted.is_empty());
    }

    #[test]
    fn test_error_code_defaults_to_unknown() {
        assert_eq!(BulkDeleteErrorBody::code_from(r#"{"error":"forbidden"}"#), "forbidden");
        assert_eq!(BulkDeleteErrorBody::code_from("<html>502</html>"), "unknown");
        assert_eq!(BulkDeleteErrorBody::code_from(r#"{"error":""}"#), "unknown");
        assert_eq!(BulkDeleteErrorBody::code_from(""), "unknown");
    }
}
