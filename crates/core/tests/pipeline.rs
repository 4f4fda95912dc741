use calamine::{open_workbook, Data, Reader, Xlsx};
use chrono::NaiveDate;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};
use notas_core::schema::{OUTPUT_COLUMNS, SOURCE_COLUMNS};
use notas_core::{
    combine_tables, export, CleanConfig, Cleaner, ExportFormat, Pipeline, PipelineConfig,
    PipelineError, RecordSet, TableExtractor,
};
use notas_pdf::{PdfError, PdfOptions, RawTable};
use notas_sheet::Sheet;
use std::fs::File;
use std::io::{BufReader, Write};
use tempfile::tempdir;

struct StubExtractor {
    tables: Vec<RawTable>,
}

impl TableExtractor for StubExtractor {
    fn extract(&self, _pdf: &[u8]) -> Result<Vec<RawTable>, PdfError> {
        Ok(self.tables.clone())
    }
}

fn table(page: usize, rows: &[[&str; 12]]) -> RawTable {
    let mut all = vec![SOURCE_COLUMNS.to_vec()];
    all.extend(rows.iter().map(|r| r.to_vec()));
    RawTable::new(page, all)
}

const ANA: [&str; 12] = [
    "A", "Ana", "123", "2", "01/01/1990", "7", "8", "9", "10", "x", "y", "15",
];
const BEA: [&str; 12] = [
    "A", "Bea", "124", "1", "02/02/1990", "6", "7", "8", "9", "x", "y", "Elimin.",
];

fn stub_pipeline(tables: Vec<RawTable>) -> Pipeline<StubExtractor> {
    Pipeline::with_extractor(StubExtractor { tables }, PipelineConfig::default())
}

/// A one-page PDF drawing each non-empty cell at its own position.
fn score_sheet_pdf(rows: &[[&str; 12]]) -> Vec<u8> {
    let mut operations = Vec::new();
    for (r, row) in rows.iter().enumerate() {
        let y = 500 - 12 * r as i64;
        for (c, text) in row.iter().enumerate().filter(|(_, t)| !t.is_empty()) {
            let x = 40 + 60 * c as i64;
            operations.extend([
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec!["F1".into(), 8.into()]),
                Operation::new("Td", vec![x.into(), y.into()]),
                Operation::new("Tj", vec![Object::string_literal(*text)]),
                Operation::new("ET", vec![]),
            ]);
        }
    }

    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });
    let content = Content { operations };
    let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "Contents" => content_id,
        "Resources" => dictionary! { "Font" => dictionary! { "F1" => font_id } },
    });
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => vec![page_id.into()],
            "Count" => 1,
            "MediaBox" => vec![0.into(), 0.into(), 842.into(), 595.into()],
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).unwrap();
    bytes
}

// ===== Scenarios =====

#[test]
fn test_two_tables_one_row_each() {
    let pipeline = stub_pipeline(vec![table(1, &[ANA]), table(2, &[BEA])]);
    let output = pipeline.run(b"%PDF-1.4").unwrap();

    assert_eq!(output.combined.row_count(), 2);
    assert_eq!(output.records.len(), 2);

    let bea = &output.records.records[1];
    assert_eq!(bea.nome, "Bea");
    assert_eq!(bea.total, 0.0);
    assert_eq!(bea.data_nac, NaiveDate::from_ymd_opt(1990, 2, 2).unwrap());

    let ana = &output.records.records[0];
    assert_eq!(ana.nro_filho, 2);
    assert_eq!(ana.total, 15.0);
}

#[test]
fn test_unparseable_score_is_dropped() {
    let mut bad = ANA;
    bad[1] = "Caio";
    bad[5] = "abc";
    let pipeline = stub_pipeline(vec![table(1, &[ANA, bad, BEA])]);

    let output = pipeline.run(b"%PDF-").unwrap();
    let names: Vec<&str> = output
        .records
        .records
        .iter()
        .map(|r| r.nome.as_str())
        .collect();
    assert_eq!(names, ["Ana", "Bea"]);
}

#[test]
fn test_identical_rows_collapse() {
    let pipeline = stub_pipeline(vec![table(1, &[ANA, BEA]), table(2, &[ANA])]);
    let output = pipeline.run(b"%PDF-").unwrap();

    assert_eq!(output.combined.row_count(), 3);
    assert_eq!(output.records.len(), 2);
    assert_eq!(output.records.stats.duplicates_removed, 1);
}

#[test]
fn test_comma_decimals() {
    let mut row = ANA;
    row[5] = "7,5";
    row[11] = "15,25";
    let output = stub_pipeline(vec![table(1, &[row])]).run(b"").unwrap();
    assert_eq!(output.records.records[0].geo, 7.5);
    assert_eq!(output.records.records[0].total, 15.25);
}

#[test]
fn test_pdf_with_blank_cells_end_to_end() {
    let header: [&str; 12] = SOURCE_COLUMNS;
    let mut bea = BEA;
    bea[9] = "";
    bea[10] = "";
    let mut caio = ANA;
    caio[1] = "Caio";
    caio[2] = "125";
    let mut dani = ANA;
    dani[1] = "Dani";
    dani[2] = "126";
    let pdf = score_sheet_pdf(&[header, ANA, bea, caio, dani]);

    let output = Pipeline::new(PipelineConfig::default()).run(&pdf).unwrap();
    assert_eq!(output.combined.row_count(), 4);
    let names: Vec<&str> = output
        .records
        .records
        .iter()
        .map(|r| r.nome.as_str())
        .collect();
    assert_eq!(names, ["Ana", "Bea", "Caio", "Dani"]);
    assert_eq!(output.records.records[1].total, 0.0);
    assert_eq!(output.artifact.file_name, "dados_limpos_pdf.xlsx");
}

#[test]
fn test_out_of_range_birth_year_does_not_break_export() {
    let mut bea = BEA;
    bea[4] = "02/02/0190";
    let output = stub_pipeline(vec![table(1, &[ANA, bea])]).run(b"").unwrap();

    assert_eq!(output.records.len(), 1);
    assert_eq!(output.records.records[0].nome, "Ana");
    assert!(!output.artifact.bytes.is_empty());
}

// ===== Properties =====

#[test]
fn test_output_has_no_nulls_and_no_duplicates() {
    let mut no_date = BEA;
    no_date[4] = "sem data";
    let mut no_total = ANA;
    no_total[11] = "";
    let output = stub_pipeline(vec![table(1, &[ANA, ANA, no_date, no_total, BEA])])
        .run(b"")
        .unwrap();

    let sheet = output.records.to_sheet().unwrap();
    assert!(sheet.rows().all(|row| row.iter().all(|c| !c.is_null())));

    let mut dedup = sheet.clone();
    assert_eq!(dedup.remove_duplicates_by_columns(&[]).unwrap(), 0);
    assert_eq!(output.records.len(), 2);
}

#[test]
fn test_cleaning_is_idempotent() {
    let first = stub_pipeline(vec![table(1, &[ANA, BEA, ANA])])
        .run(b"")
        .unwrap()
        .records;

    // Pad the cleaned rows back into the 12-column source layout
    let rows: Vec<Vec<String>> = first
        .to_sheet()
        .unwrap()
        .rows()
        .map(|row| {
            let cells: Vec<String> = row.iter().map(ToString::to_string).collect();
            let mut padded = vec!["A".to_string()];
            padded.extend(cells[..8].iter().cloned());
            padded.push("x".to_string());
            padded.push("y".to_string());
            padded.push(cells[8].clone());
            padded
        })
        .collect();
    let combined = Sheet::from_rows(SOURCE_COLUMNS, rows).unwrap();

    let second = Cleaner::new(CleanConfig::default()).clean(&combined).unwrap();
    assert_eq!(second.records, first.records);
}

#[test]
fn test_combine_preserves_order_and_count() {
    let tables = vec![table(1, &[ANA, BEA]), table(2, &[]), table(3, &[BEA])];
    let combined = combine_tables(&tables).unwrap();
    assert_eq!(combined.row_count(), 3);
    assert_eq!(combined.get(0, 1).unwrap().as_str(), "Ana");
    assert_eq!(combined.get(2, 1).unwrap().as_str(), "Bea");
}

// ===== Errors =====

#[test]
fn test_eleven_columns_fail_cleaning() {
    let header: Vec<&str> = SOURCE_COLUMNS[..11].to_vec();
    let row: Vec<&str> = ANA[..11].to_vec();
    let pipeline = stub_pipeline(vec![RawTable::new(1, vec![header, row])]);

    let err = pipeline.run(b"").unwrap_err();
    assert!(matches!(err, PipelineError::Cleaning(_)));
    assert_eq!(
        err.to_string(),
        "Erro durante a limpeza dos dados: expected 12 columns, found 11"
    );
}

#[test]
fn test_not_a_pdf_fails_extraction() {
    let pipeline = Pipeline::new(PipelineConfig::default());
    let err = pipeline.run(b"Nome;Total\nAna;15\n").unwrap_err();
    assert!(matches!(err, PipelineError::Extraction(_)));
    assert!(err.to_string().starts_with("Erro ao processar o PDF:"));
}

#[test]
fn test_invalid_page_range_fails_extraction() {
    let config = PipelineConfig::default().with_pdf_options(PdfOptions::default().with_page_range(3, 1));
    let err = Pipeline::new(config).run(b"%PDF-1.4").unwrap_err();
    assert!(matches!(err, PipelineError::Extraction(_)));
}

// ===== Export =====

#[test]
fn test_xlsx_artifact_reads_back() {
    let output = stub_pipeline(vec![table(1, &[ANA]), table(2, &[BEA])])
        .run(b"")
        .unwrap();
    assert_eq!(output.artifact.file_name, "dados_limpos_pdf.xlsx");

    let dir = tempdir().unwrap();
    let path = dir.path().join(&output.artifact.file_name);
    File::create(&path)
        .unwrap()
        .write_all(&output.artifact.bytes)
        .unwrap();

    let mut workbook: Xlsx<BufReader<File>> = open_workbook(&path).unwrap();
    let range = workbook.worksheet_range("Sheet1").unwrap();
    let rows: Vec<_> = range.rows().collect();

    assert_eq!(rows.len(), 3);
    let header: Vec<String> = rows[0].iter().map(ToString::to_string).collect();
    assert_eq!(header, OUTPUT_COLUMNS);
    assert_eq!(rows[2][0], Data::String("Bea".to_string()));
    assert!(matches!(rows[2][8], Data::Float(f) if f.abs() < 1e-9));
}

#[test]
fn test_csv_and_json_formats() {
    let records: RecordSet = stub_pipeline(vec![table(1, &[BEA])]).run(b"").unwrap().records;

    let csv = String::from_utf8(export(&records, ExportFormat::Csv).unwrap()).unwrap();
    assert_eq!(csv.lines().count(), 2);
    assert!(csv.starts_with("Nome,NumInsc,NroFilho,DataNac"));

    let json: serde_json::Value =
        serde_json::from_slice(&export(&records, ExportFormat::Json).unwrap()).unwrap();
    assert_eq!(json.as_array().map(Vec::len), Some(1));
    assert_eq!(json[0]["Total"], 0.0);

    let config = PipelineConfig::default().with_export_format(ExportFormat::Json);
    let artifact = Pipeline::with_extractor(
        StubExtractor {
            tables: vec![table(1, &[BEA])],
        },
        config,
    )
    .run(b"")
    .unwrap()
    .artifact;
    assert_eq!(artifact.file_name, "dados_limpos_pdf.json");
}
