// src/mail/message.rs
//! Message composition and MIME encoding.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::types::profile::MessageTemplate;
use crate::utils::fill_placeholders;

const MIME_LINE_WIDTH: usize = 76;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    pub filename: String,
    pub content: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingMessage {
    pub to: String,
    pub subject: String,
    pub html_body: String,
    pub attachment: Option<Attachment>,
}

/// `Application for <position> at <company>`
pub fn subject_line(position: &str, company: &str) -> String {
    format!("Application for {} at {}", position, company)
}

/// Opening, constant, one randomly drawn variable fragment and ending,
/// with `{company}`, `{position}` and `{name}` filled in.
pub fn compose_body<R: Rng>(
    template: &MessageTemplate,
    company: &str,
    position: &str,
    sender_name: &str,
    rng: &mut R,
) -> String {
    let opening = fill_placeholders(&template.opening.concat(), &[("company", company)]);
    let constant = fill_placeholders(&template.constant.concat(), &[("position", position)]);
    let variable = template
        .variable
        .choose(rng)
        .map(|fragment| fill_placeholders(fragment, &[("company", company)]))
        .unwrap_or_default();
    let ending = fill_placeholders(&template.ending.concat(), &[("name", sender_name)]);

    format!(
        "<html>\n<body>\n{}\n{}\n{}\n{}\n</body>\n</html>\n",
        opening, constant, variable, ending
    )
}

/// RFC 2047 encoded-word for non-ASCII header values
fn header_value(value: &str) -> String {
    if value.is_ascii() {
        value.to_string()
    } else {
        format!("=?utf-8?B?{}?=", STANDARD.encode(value.as_bytes()))
    }
}

fn wrapped_base64(bytes: &[u8]) -> String {
    let encoded = STANDARD.encode(bytes);
    let mut out = String::with_capacity(encoded.len() + encoded.len() / MIME_LINE_WIDTH * 2 + 2);
    for chunk in encoded.as_bytes().chunks(MIME_LINE_WIDTH) {
        // base64 output is ASCII
        out.push_str(&String::from_utf8_lossy(chunk));
        out.push_str("\r\n");
    }
    out
}

impl OutgoingMessage {
    /// `multipart/mixed` document: an HTML part, then the attachment if any
    pub fn to_mime(&self, boundary: &str) -> String {
        let mut mime = String::new();
        mime.push_str(&format!("To: {}\r\n", self.to));
        mime.push_str(&format!("Subject: {}\r\n", header_value(&self.subject)));
        mime.push_str("MIME-Version: 1.0\r\n");
        mime.push_str(&format!(
            "Content-Type: multipart/mixed; boundary=\"{}\"\r\n\r\n",
            boundary
        ));

        mime.push_str(&format!("--{}\r\n", boundary));
        mime.push_str("Content-Type: text/html; charset=\"utf-8\"\r\n");
        mime.push_str("Content-Transfer-Encoding: base64\r\n\r\n");
        mime.push_str(&wrapped_base64(self.html_body.as_bytes()));

        if let Some(attachment) = &self.attachment {
            mime.push_str(&format!("--{}\r\n", boundary));
            mime.push_str("Content-Type: application/octet-stream\r\n");
            mime.push_str("Content-Transfer-Encoding: base64\r\n");
            mime.push_str(&format!(
                "Content-Disposition: attachment; filename=\"{}\"\r\n\r\n",
                attachment.filename
            ));
            mime.push_str(&wrapped_base64(&attachment.content));
        }

        mime.push_str(&format!("--{}--\r\n", boundary));
        mime
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn template() -> MessageTemplate {
        MessageTemplate {
            opening: vec!["Dear {company} ".into(), "team,".into()],
            constant: vec!["I am applying for {position}.".into()],
            variable: vec!["I admire {company}.".into(), "{company} inspires me.".into()],
            ending: vec!["Regards, {name}".into()],
        }
    }

    #[test]
    fn test_body_fills_every_fragment() {
        let mut rng = StdRng::seed_from_u64(1);
        let body = compose_body(&template(), "Acme", "Backend Engineer", "Jane", &mut rng);

        assert!(body.starts_with("<html>\n<body>\n"));
        assert!(body.contains("Dear Acme team,"));
        assert!(body.contains("I am applying for Backend Engineer."));
        assert!(body.contains("I admire Acme.") || body.contains("Acme inspires me."));
        assert!(body.contains("Regards, Jane"));
        assert!(body.trim_end().ends_with("</body>\n</html>"));
    }

    #[test]
    fn test_same_seed_same_variable_fragment() {
        let a = compose_body(&template(), "Acme", "Dev", "Jane", &mut StdRng::seed_from_u64(9));
        let b = compose_body(&template(), "Acme", "Dev", "Jane", &mut StdRng::seed_from_u64(9));
        assert_eq!(a, b);
    }

    #[test]
    fn test_subject_line() {
        assert_eq!(
            subject_line("Senior Fullstack Developer", "Globex"),
            "Application for Senior Fullstack Developer at Globex"
        );
    }

    #[test]
    fn test_mime_layout() {
        let message = OutgoingMessage {
            to: "jobs@acme.com".into(),
            subject: "Application for Dev at Acme".into(),
            html_body: "<html></html>".into(),
            attachment: Some(Attachment {
                filename: "curriculum_Acme.pdf".into(),
                content: b"%PDF-1.3".to_vec(),
            }),
        };
        let mime = message.to_mime("b0undary");

        assert!(mime.starts_with("To: jobs@acme.com\r\nSubject: Application for Dev at Acme\r\n"));
        assert!(mime.contains("Content-Type: multipart/mixed; boundary=\"b0undary\""));
        assert!(mime.contains("filename=\"curriculum_Acme.pdf\""));
        assert!(mime.contains(&STANDARD.encode(b"%PDF-1.3")));
        assert_eq!(mime.matches("--b0undary\r\n").count(), 2);
        assert!(mime.ends_with("--b0undary--\r\n"));
    }

    #[test]
    fn test_non_ascii_subject_is_encoded() {
        assert_eq!(header_value("plain"), "plain");
        assert!(header_value("Candidature chez Société").starts_with("=?utf-8?B?"));
    }
}
