use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::api::resources::Mehfils;
use crate::domain::mehfil::{Mehfil, NewMehfil};
use crate::domain::types::{FileUrl, MehfilId, MehfilType, NonEmptyString, Prayer, optional_text};
use crate::forms::{
    DATE_FORMAT, Editable, FormError, copy_title, parse_date, validate_date,
    validate_optional_url, validate_required,
};
use crate::transport::ApiResult;
use crate::upload::FileUploader;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
/// Input of the mehfil dialog.
pub struct MehfilForm {
    /// Mehfil title in English.
    #[validate(custom(function = "validate_required", message = "Title (English) is required"))]
    pub title_en: String,
    /// Mehfil title in Urdu.
    #[validate(custom(function = "validate_required", message = "Title (Urdu) is required"))]
    pub title_ur: String,
    /// Day of the gathering as typed, `YYYY-MM-DD`.
    #[validate(custom(function = "validate_date"))]
    pub date: String,
    /// Prayer the gathering follows.
    #[validate(required(message = "Time is required"))]
    pub time: Option<Prayer>,
    /// Kind of gathering.
    #[validate(required(message = "Type is required"))]
    pub mehfil_type: Option<MehfilType>,
    /// URL of the uploaded recording.
    #[validate(custom(function = "validate_optional_url"))]
    pub filepath: String,
    /// Whether the mehfil is visible to the public.
    pub is_published: bool,
}

impl MehfilForm {
    /// Uploads a recording and points the form at the returned URL.
    ///
    /// The previous file stays attached when the upload fails.
    pub fn attach_audio(
        &mut self,
        uploader: &dyn FileUploader,
        file_name: &str,
        bytes: &[u8],
    ) -> ApiResult<()> {
        let url = uploader.upload(file_name, bytes)?;
        log::debug!("Uploaded {file_name} to {url}");
        self.filepath = url;
        Ok(())
    }

    pub fn detach_audio(&mut self) {
        self.filepath.clear();
    }
}

impl Editable for Mehfils {
    type Form = MehfilForm;

    fn entity_id(entity: &Mehfil) -> MehfilId {
        entity.id
    }

    fn edit_form(mehfil: &Mehfil) -> MehfilForm {
        MehfilForm {
            title_en: mehfil.title_en.clone(),
            title_ur: mehfil.title_ur.clone(),
            date: mehfil
                .date
                .map(|date| date.format(DATE_FORMAT).to_string())
                .unwrap_or_default(),
            time: mehfil.prayer_time(),
            mehfil_type: mehfil.kind(),
            filepath: mehfil.filepath.clone().unwrap_or_default(),
            is_published: mehfil.is_published,
        }
    }

    fn duplicate_form(mehfil: &Mehfil) -> MehfilForm {
        let mut form = Self::edit_form(mehfil);
        form.title_en = copy_title(&mehfil.title_en);
        form.title_ur = copy_title(&mehfil.title_ur);
        form
    }

    fn to_payload(form: &MehfilForm) -> Result<NewMehfil, FormError> {
        Ok(NewMehfil {
            title_en: NonEmptyString::new(form.title_en.as_str())?,
            title_ur: NonEmptyString::new(form.title_ur.as_str())?,
            date: parse_date(&form.date).ok_or(FormError::InvalidDate)?,
            time: form.time.ok_or(FormError::Required)?,
            mehfil_type: form.mehfil_type.ok_or(FormError::Required)?,
            filepath: optional_text(Some(&form.filepath))
                .map(FileUrl::new)
                .transpose()?,
            is_published: form.is_published,
        })
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::transport::ApiError;
    use crate::upload::mock::MockFileUploader;

    fn filled() -> MehfilForm {
        MehfilForm {
            title_en: "Monthly Zikr".into(),
            title_ur: "ماہانہ ذکر".into(),
            date: "2024-03-01".into(),
            time: Some(Prayer::Isha),
            mehfil_type: Some(MehfilType::Zikr),
            filepath: String::new(),
            is_published: true,
        }
    }

    #[test]
    fn payload_carries_labels_and_date() {
        let payload = Mehfils::validated_payload(&filled()).unwrap();
        let value = serde_json::to_value(&payload).unwrap();

        assert_eq!(value["time"], json!("Isha"));
        assert_eq!(value["type"], json!("Mehfil-e-Zikr"));
        assert_eq!(value["date"], json!("2024-03-01"));
        assert!(value.get("filepath").is_none());
    }

    #[test]
    fn missing_selects_and_bad_date_are_reported() {
        let form = MehfilForm {
            date: "01/03/2024".into(),
            time: None,
            mehfil_type: None,
            ..filled()
        };

        let fields: Vec<String> = Mehfils::validated_payload(&form)
            .unwrap_err()
            .field_errors()
            .into_iter()
            .map(|(field, _)| field)
            .collect();

        assert_eq!(fields, vec!["date", "mehfil_type", "time"]);
    }

    #[test]
    fn uploaded_url_is_stored_on_the_form() {
        let mut uploader = MockFileUploader::new();
        uploader
            .expect_upload()
            .withf(|name, bytes| name.to_string() == "zikr.mp3" && bytes.to_vec() == b"ID3".to_vec())
            .times(1)
            .returning(|_, _| Ok("https://cdn.example.org/audio/zikr.mp3".to_string()));

        let mut form = filled();
        form.attach_audio(&uploader, "zikr.mp3", b"ID3").unwrap();

        let payload = Mehfils::validated_payload(&form).unwrap();
        assert_eq!(
            payload.filepath.map(FileUrl::into_inner),
            Some("https://cdn.example.org/audio/zikr.mp3".to_string())
        );
    }

    #[test]
    fn failed_upload_keeps_previous_file() {
        let mut uploader = MockFileUploader::new();
        uploader
            .expect_upload()
            .returning(|_, _| Err(ApiError::Network("connection reset".into())));

        let mut form = MehfilForm {
            filepath: "https://cdn.example.org/audio/old.mp3".into(),
            ..filled()
        };

        assert!(form.attach_audio(&uploader, "new.mp3", b"").is_err());
        assert_eq!(form.filepath, "https://cdn.example.org/audio/old.mp3");
    }

    #[test]
    fn edit_prefill_formats_the_date() {
        let mehfil: Mehfil = serde_json::from_value(json!({
            "id": 2,
            "title_en": "Urs",
            "date": "2024-11-05",
            "time": "Maghrib",
            "type": "Urs"
        }))
        .unwrap();

        let form = Mehfils::edit_form(&mehfil);

        assert_eq!(form.date, "2024-11-05");
        assert_eq!(form.time, Some(Prayer::Maghrib));
        assert_eq!(form.mehfil_type, Some(MehfilType::Urs));
    }
}
