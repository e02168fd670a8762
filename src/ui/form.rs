use std::fmt::Write as _;
use tokio::io::{AsyncBufRead, AsyncWrite, AsyncWriteExt, Lines};

use crate::models::{FormCapture, HealthField, HealthRecord};

/// Walks through every field, prompting with its label and hint.
/// Every answer overwrites its field; empty or malformed answers become
/// zero. Returns `false` on end of input.
pub async fn prompt_fields<R, W>(
    lines: &mut Lines<R>,
    out: &mut W,
    form: &mut FormCapture,
) -> std::io::Result<bool>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    for field in HealthField::ALL {
        let prompt = format!("{} {}: ", field.label(), hint_text(field));
        out.write_all(prompt.as_bytes()).await?;
        out.flush().await?;

        match lines.next_line().await? {
            Some(answer) => form.set(field, &answer),
            None => return Ok(false),
        }
    }
    Ok(true)
}

/// Advisory range shown next to a prompt, e.g. `[0-17] (0 to 17, step 1)`.
pub fn hint_text(field: HealthField) -> String {
    let hint = field.hint();
    format!("[{}] ({} to {}, step {})", hint.placeholder, hint.min, hint.max, hint.step)
}

pub fn render_record(record: &HealthRecord) -> String {
    let mut out = String::new();
    for field in HealthField::ALL {
        let _ = writeln!(out, "  {:<24} {}", field.label(), record.get(field));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::AsyncBufReadExt;

    #[tokio::test]
    async fn fills_every_field_in_order() {
        let input: &[u8] = b"2\n148\n72\n\n0\n33.6\n0.627\n50\n";
        let mut lines = input.lines();
        let mut out = Vec::new();
        let mut form = FormCapture::new();
        form.set(HealthField::SkinThickness, "35");

        let finished = prompt_fields(&mut lines, &mut out, &mut form).await.unwrap();

        assert!(finished);
        let record = form.submit();
        assert_eq!(record.glucose, 148.0);
        assert_eq!(record.skin_thickness, 0.0);
        assert_eq!(record.diabetes_pedigree_function, 0.627);
        assert_eq!(record.age, 50.0);

        let prompts = String::from_utf8(out).unwrap();
        assert!(prompts.starts_with("Pregnancies [0-17] (0 to 17, step 1): "));
        assert!(prompts.contains("Diabetes Pedigree [0.0-2.5] (0 to 3, step 0.001): "));
        assert!(prompts.contains("Age (years) [21-80] (1 to 120, step 1): "));
    }

    #[tokio::test]
    async fn empty_answers_reset_fields_to_zero() {
        let input: &[u8] = b"\n\n\n\n\n\n\n\n";
        let mut lines = input.lines();
        let mut out = Vec::new();
        let mut form = FormCapture::new();
        form.set(HealthField::Glucose, "148");
        form.set(HealthField::Age, "50");

        let finished = prompt_fields(&mut lines, &mut out, &mut form).await.unwrap();

        assert!(finished);
        assert_eq!(form.submit(), HealthRecord::default());
    }

    #[tokio::test]
    async fn stops_at_end_of_input() {
        let input: &[u8] = b"1\n";
        let mut lines = input.lines();
        let mut out = Vec::new();
        let mut form = FormCapture::new();

        let finished = prompt_fields(&mut lines, &mut out, &mut form).await.unwrap();

        assert!(!finished);
        assert_eq!(form.record().pregnancies, 1.0);
    }
}
