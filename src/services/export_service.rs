use crate::error::Result;
use crate::models::attempt::Attempt;
use crate::models::quiz::Quiz;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use rust_xlsxwriter::*;

pub struct ExportService;

impl ExportService {
    fn escape_csv(field: &str) -> String {
        if field.contains([',', '"', '\n', '\r']) {
            format!("\"{}\"", field.replace('"', "\"\""))
        } else {
            field.to_string()
        }
    }

    fn percentage(attempt: &Attempt) -> f64 {
        if attempt.max_points > 0 {
            (attempt.earned_points as f64) * 100.0 / (attempt.max_points as f64)
        } else {
            0.0
        }
    }

    /// Render a quiz's results as CSV rows.
    pub fn results_csv(attempts: &[Attempt]) -> String {
        let mut csv = String::from(
            "student_name,student_email,earned_points,max_points,percentage,passed,submitted_at\n",
        );
        for attempt in attempts {
            csv.push_str(&format!(
                "{},{},{},{},{:.1},{},{}\n",
                Self::escape_csv(&attempt.student_name),
                Self::escape_csv(&attempt.student_email),
                attempt.earned_points,
                attempt.max_points,
                Self::percentage(attempt),
                attempt.passed,
                attempt.submitted_at.format("%Y-%m-%d %H:%M:%S"),
            ));
        }
        csv
    }

    /// Wrap CSV rows in a downloadable data URL.
    pub fn csv_data_url(csv: &str) -> String {
        format!("data:text/csv;base64,{}", BASE64.encode(csv.as_bytes()))
    }

    /// Generate a styled XLSX workbook from a quiz's results.
    pub fn results_xlsx(quiz: &Quiz, attempts: &[Attempt]) -> Result<Vec<u8>> {
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        worksheet.set_name("Results")?;

        let header_bg = Color::RGB(0x0F172A); // Slate 900
        let alt_row = Color::RGB(0xF8FAFC); // Slate 50
        let border_color = Color::RGB(0xE2E8F0); // Slate 200
        let passed_color = Color::RGB(0x10B981); // Emerald
        let failed_color = Color::RGB(0xEF4444); // Red

        let columns = [
            ("#", 8.0),
            ("Student", 30.0),
            ("Email", 32.0),
            ("Score", 12.0),
            ("Max", 12.0),
            ("Percent", 12.0),
            ("Passed", 12.0),
            ("Submitted", 22.0),
        ];
        for (i, (_, width)) in columns.iter().enumerate() {
            worksheet.set_column_width(i as u16, *width)?;
        }

        let title_format = Format::new()
            .set_font_size(14)
            .set_bold()
            .set_font_color(Color::White)
            .set_background_color(header_bg)
            .set_align(FormatAlign::CenterAcross)
            .set_align(FormatAlign::VerticalCenter);
        worksheet.set_row_height(0, 32)?;
        worksheet.merge_range(
            0,
            0,
            0,
            (columns.len() - 1) as u16,
            &format!("Results: {}", quiz.title),
            &title_format,
        )?;

        let header_format = Format::new()
            .set_bold()
            .set_font_size(10)
            .set_font_color(Color::White)
            .set_background_color(header_bg)
            .set_align(FormatAlign::Center)
            .set_align(FormatAlign::VerticalCenter)
            .set_border(FormatBorder::Thin)
            .set_border_color(border_color);
        let header_row = 1;
        worksheet.set_row_height(header_row, 24)?;
        for (i, (name, _)) in columns.iter().enumerate() {
            worksheet.write_string_with_format(header_row, i as u16, *name, &header_format)?;
        }

        let data_start_row = 2;
        for (idx, attempt) in attempts.iter().enumerate() {
            let row = data_start_row + idx as u32;
            let bg = if idx % 2 == 0 { alt_row } else { Color::White };

            let base_fmt = Format::new()
                .set_font_size(10)
                .set_background_color(bg)
                .set_align(FormatAlign::VerticalCenter)
                .set_border(FormatBorder::Thin)
                .set_border_color(border_color);
            let center_fmt = base_fmt.clone().set_align(FormatAlign::Center);

            worksheet.write_number_with_format(row, 0, (idx + 1) as f64, &center_fmt)?;
            worksheet.write_string_with_format(
                row,
                1,
                &attempt.student_name,
                &base_fmt.clone().set_bold(),
            )?;
            worksheet.write_string_with_format(row, 2, &attempt.student_email, &base_fmt)?;
            worksheet.write_number_with_format(row, 3, attempt.earned_points as f64, &center_fmt)?;
            worksheet.write_number_with_format(row, 4, attempt.max_points as f64, &center_fmt)?;
            worksheet.write_string_with_format(
                row,
                5,
                &format!("{:.1}%", Self::percentage(attempt)),
                &center_fmt,
            )?;

            let verdict_fmt = Format::new()
                .set_font_size(10)
                .set_bold()
                .set_font_color(Color::White)
                .set_background_color(if attempt.passed { passed_color } else { failed_color })
                .set_align(FormatAlign::Center)
                .set_align(FormatAlign::VerticalCenter)
                .set_border(FormatBorder::Thin)
                .set_border_color(border_color);
            worksheet.write_string_with_format(
                row,
                6,
                if attempt.passed { "Passed" } else { "Failed" },
                &verdict_fmt,
            )?;

            worksheet.write_string_with_format(
                row,
                7,
                &attempt.submitted_at.format("%d.%m.%Y %H:%M").to_string(),
                &center_fmt,
            )?;
        }

        let total_row = data_start_row + attempts.len() as u32 + 1;
        let summary_fmt = Format::new()
            .set_bold()
            .set_font_size(10)
            .set_background_color(Color::RGB(0xE0E7FF)) // Indigo 100
            .set_align(FormatAlign::Center)
            .set_align(FormatAlign::VerticalCenter)
            .set_border(FormatBorder::Thin)
            .set_border_color(border_color);

        let passed_count = attempts.iter().filter(|a| a.passed).count();
        worksheet.merge_range(
            total_row,
            0,
            total_row,
            2,
            &format!("Total: {} submissions", attempts.len()),
            &summary_fmt,
        )?;
        worksheet.merge_range(
            total_row,
            3,
            total_row,
            7,
            &format!(
                "Passed: {} | Failed: {} | Passing score: {}%",
                passed_count,
                attempts.len() - passed_count,
                quiz.passing_score
            ),
            &summary_fmt,
        )?;

        worksheet.set_freeze_panes(2, 0)?;
        if !attempts.is_empty() {
            worksheet.autofilter(
                1,
                0,
                data_start_row + attempts.len() as u32 - 1,
                (columns.len() - 1) as u16,
            )?;
        }

        let buffer = workbook.save_to_buffer()?;
        Ok(buffer)
    }
}
