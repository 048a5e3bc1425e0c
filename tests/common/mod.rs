#![allow(dead_code)]

use std::fs::{self, File};
use std::io::Write;
use std::path::Path;
use zip::write::SimpleFileOptions;

pub const ID_COLUMN: &str = "รหัสนิสิต";
pub const PROJECT_COLUMN: &str = "ชื่อโปรเจ็ค";

fn escape_xml(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn write_zip(path: &Path, parts: &[(&str, String)]) {
    let file = File::create(path).expect("create zip");
    let mut zip = zip::ZipWriter::new(file);
    for (name, body) in parts {
        zip.start_file(*name, SimpleFileOptions::default())
            .expect("start part");
        zip.write_all(body.as_bytes()).expect("write part");
    }
    zip.finish().expect("finish zip");
}

pub fn write_docx(path: &Path, paragraphs: &[&str]) {
    let body: String = paragraphs
        .iter()
        .map(|p| format!(r#"<w:p><w:r><w:t xml:space="preserve">{}</w:t></w:r></w:p>"#, escape_xml(p)))
        .collect();
    let xml = format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>{body}</w:body></w:document>"#
    );
    write_zip(path, &[("word/document.xml", xml)]);
}

fn column_letter(idx: usize) -> char {
    (b'A' + idx as u8) as char
}

fn cell(row: usize, col: usize, value: &str) -> String {
    let r = format!("{}{}", column_letter(col), row);
    if !value.is_empty() && value.bytes().all(|b| b.is_ascii_digit()) {
        format!(r#"<c r="{r}"><v>{value}</v></c>"#)
    } else {
        format!(
            r#"<c r="{r}" t="inlineStr"><is><t>{}</t></is></c>"#,
            escape_xml(value)
        )
    }
}

/// Single-sheet workbook; numeric-looking cells are stored as numbers.
pub fn write_xlsx(path: &Path, rows: &[&[&str]]) {
    let mut sheet_data = String::new();
    for (i, row) in rows.iter().enumerate() {
        let r = i + 1;
        sheet_data.push_str(&format!(r#"<row r="{r}">"#));
        for (c, value) in row.iter().enumerate() {
            sheet_data.push_str(&cell(r, c, value));
        }
        sheet_data.push_str("</row>");
    }

    let content_types = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/><Override PartName="/xl/worksheets/sheet1.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/></Types>"#;
    let root_rels = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/></Relationships>"#;
    let workbook = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships"><sheets><sheet name="Sheet1" sheetId="1" r:id="rId1"/></sheets></workbook>"#;
    let workbook_rels = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet1.xml"/></Relationships>"#;
    let sheet = format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><sheetData>{sheet_data}</sheetData></worksheet>"#
    );

    write_zip(
        path,
        &[
            ("[Content_Types].xml", content_types.to_string()),
            ("_rels/.rels", root_rels.to_string()),
            ("xl/workbook.xml", workbook.to_string()),
            ("xl/_rels/workbook.xml.rels", workbook_rels.to_string()),
            ("xl/worksheets/sheet1.xml", sheet),
        ],
    );
}

pub fn write_csv(path: &Path, rows: &[(&str, &str)]) {
    let mut raw = format!("{ID_COLUMN},{PROJECT_COLUMN}\n");
    for (id, project) in rows {
        raw.push_str(&format!("{id},{project}\n"));
    }
    fs::write(path, raw).expect("write csv");
}

pub fn sorted_names(folder: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(folder)
        .expect("read dir")
        .map(|e| e.expect("entry").file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

/// `docrename` isolated from the caller's config file, dotenv and env overrides.
pub fn docrename(home: &Path) -> assert_cmd::Command {
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("docrename");
    cmd.current_dir(home)
        .env("DOCRENAME_HOME", home)
        .env("DOCRENAME_CONFIG_PATH", home.join("absent.toml"))
        .env_remove("DOCRENAME_SOURCE_FOLDER")
        .env_remove("DOCRENAME_SPREADSHEET")
        .env_remove("DOCRENAME_EXTENSION")
        .env_remove("DOCRENAME_ID_COLUMN")
        .env_remove("DOCRENAME_PROJECT_COLUMN")
        .env_remove("DOCRENAME_LINE_BUDGET")
        .env_remove("DOCRENAME_COLLISION_POLICY")
        .env_remove("DOCRENAME_JOURNAL_PATH")
        .env_remove("DOCRENAME_LOG")
        .env_remove("RUST_LOG");
    cmd
}
