use rust_xlsxwriter::Workbook as XlsxWorkbook;
use sheetviz_viz::{
    ArtifactEvent, ChartKind, ChartSummary, ColumnRole, Pipeline, PipelineConfig, VizError,
};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tempfile::{tempdir, TempDir};

fn config(dir: &TempDir) -> PipelineConfig {
    PipelineConfig {
        upload_dir: dir.path().join("uploads"),
        result_dir: dir.path().join("results"),
        ..PipelineConfig::default()
    }
}

fn write_sales(path: &Path) {
    let mut workbook = XlsxWorkbook::new();

    let sales = workbook.add_worksheet();
    sales.set_name("Bán hàng").unwrap();
    for (col, header) in ["Sản phẩm", "Số lượng", "Thành tiền"].iter().enumerate() {
        sales.write_string(0, col as u16, *header).unwrap();
    }
    let rows = [
        ("Bút bi", 3.0, 15000.0),
        ("Vở", 2.0, 24000.0),
        ("Bút bi", 5.0, 25000.0),
        ("Thước", 1.0, 7000.0),
    ];
    for (i, (product, qty, total)) in rows.iter().enumerate() {
        let row = 1 + i as u32;
        sales.write_string(row, 0, *product).unwrap();
        sales.write_number(row, 1, *qty).unwrap();
        sales.write_number(row, 2, *total).unwrap();
    }

    let notes = workbook.add_worksheet();
    notes.set_name("Ghi chú").unwrap();
    notes.write_string(0, 0, "Ngày").unwrap();
    notes.write_string(0, 1, "Nội dung").unwrap();
    notes.write_string(1, 0, "2024-01-01").unwrap();
    notes.write_string(1, 1, "Kiểm kho").unwrap();

    workbook.save(path).unwrap();
}

fn write_sheet(path: &Path, name: &str, header: &[&str], rows: &[Vec<&str>]) {
    let mut workbook = XlsxWorkbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name(name).unwrap();
    for (col, value) in header.iter().enumerate() {
        sheet.write_string(0, col as u16, *value).unwrap();
    }
    for (r, row) in rows.iter().enumerate() {
        for (c, value) in row.iter().enumerate() {
            sheet.write_string(1 + r as u32, c as u16, *value).unwrap();
        }
    }
    workbook.save(path).unwrap();
}

fn upload(dir: &TempDir, name: &str) -> PathBuf {
    let uploads = dir.path().join("uploads");
    std::fs::create_dir_all(&uploads).unwrap();
    uploads.join(name)
}

#[test]
fn test_run_produces_one_chart_per_role() {
    let dir = tempdir().unwrap();
    let input = upload(&dir, "sales.xlsx");
    write_sales(&input);

    let pipeline = Pipeline::new(config(&dir)).unwrap();
    let report = pipeline.run(&input).unwrap();

    assert_eq!(
        report.cleaned_path.as_deref(),
        Some(dir.path().join("uploads").join("sales_Cleaned.xlsx").as_path())
    );
    assert!(dir.path().join("uploads/sales_Cleaned.xlsx").is_file());

    let sales = &report.sheets[0];
    assert_eq!(sales.name, "Bán hàng");
    assert_eq!((sales.rows, sales.columns), (4, 3));
    assert_eq!(sales.classification.first(ColumnRole::Quantity), Some("Số lượng"));
    let kinds: Vec<ChartKind> = sales.charts.iter().map(|c| c.artifact.kind).collect();
    assert_eq!(
        kinds,
        [ChartKind::Histogram, ChartKind::LineChart, ChartKind::BarChart]
    );
    assert!(sales.failures.is_empty());
    assert!(sales.warnings.is_empty());

    let notes = &report.sheets[1];
    assert!(notes.charts.is_empty());
    assert_eq!(notes.classification.unclassified().len(), 2);

    assert_eq!(
        pipeline.store().list().unwrap(),
        [
            "Ban_hang_bar_chart.png",
            "Ban_hang_histogram.png",
            "Ban_hang_line_chart.png"
        ]
    );
    let png = pipeline.store().fetch("Ban_hang_histogram.png").unwrap();
    let image = image::load_from_memory(&png).unwrap();
    assert_eq!((image.width(), image.height()), (1000, 600));
}

#[test]
fn test_observer_sees_each_chart_after_write() {
    let dir = tempdir().unwrap();
    let input = upload(&dir, "sales.xlsx");
    write_sales(&input);

    let seen: Arc<Mutex<Vec<String>>> = Arc::default();
    let sink = Arc::clone(&seen);
    let observer = move |event: &ArtifactEvent| {
        assert!(event.path.is_file());
        sink.lock().unwrap().push(event.file_name.clone());
    };
    let pipeline = Pipeline::new(config(&dir))
        .unwrap()
        .with_observer(Arc::new(observer));
    pipeline.run(&input).unwrap();

    assert_eq!(
        *seen.lock().unwrap(),
        [
            "Ban_hang_histogram.png",
            "Ban_hang_line_chart.png",
            "Ban_hang_bar_chart.png"
        ]
    );
}

#[test]
fn test_bar_chart_keeps_ten_most_frequent() {
    let dir = tempdir().unwrap();
    let input = upload(&dir, "products.xlsx");

    let mut codes: Vec<String> = (1..=15).map(|i| format!("P{i:02}")).collect();
    codes.extend(["P03", "P07", "P03", "P07", "P01"].map(String::from));
    let numbers: Vec<String> = (1..=codes.len()).map(|i| i.to_string()).collect();
    let rows: Vec<Vec<&str>> = numbers
        .iter()
        .zip(&codes)
        .map(|(n, code)| vec![n.as_str(), code.as_str()])
        .collect();
    write_sheet(&input, "Top", &["STT", "Mã SP"], &rows);

    let pipeline = Pipeline::new(config(&dir)).unwrap();
    let report = pipeline.run(&input).unwrap();
    let sheet = &report.sheets[0];
    assert_eq!(sheet.charts.len(), 1);

    let ChartSummary::BarChart { categories } = &sheet.charts[0].summary else {
        panic!("expected a bar chart");
    };
    let labels: Vec<&str> = categories.iter().map(|c| c.label.as_str()).collect();
    assert_eq!(
        labels,
        ["P03", "P07", "P01", "P02", "P04", "P05", "P06", "P08", "P09", "P10"]
    );
    assert_eq!(categories[0].count, 3);
    assert_eq!(categories[2].count, 2);
    assert!(pipeline.store().fetch("Top_bar_chart.png").is_ok());
}

#[test]
fn test_non_numeric_cells_are_dropped_with_warning() {
    let dir = tempdir().unwrap();
    let input = upload(&dir, "stock.xlsx");
    write_sheet(
        &input,
        "Kho",
        &["STT", "Số lượng", "Thành tiền"],
        &[
            vec!["1", "3", "abc"],
            vec!["2", "x", "def"],
            vec!["3", "5", "ghi"],
        ],
    );

    let pipeline = Pipeline::new(config(&dir)).unwrap();
    let report = pipeline.run(&input).unwrap();
    let sheet = &report.sheets[0];

    assert_eq!(sheet.charts.len(), 1);
    let ChartSummary::Histogram { values, bins } = &sheet.charts[0].summary else {
        panic!("expected a histogram");
    };
    assert_eq!(*values, 2);
    assert_eq!(bins.len(), 15);
    assert!((bins[0].start - 3.0).abs() < 1e-9);
    assert!((bins[14].end - 5.0).abs() < 1e-9);

    assert_eq!(sheet.warnings.len(), 1);
    assert_eq!(sheet.warnings[0].column, "Số lượng");
    assert_eq!(sheet.warnings[0].dropped, 1);

    assert_eq!(sheet.failures.len(), 1);
    assert_eq!(sheet.failures[0].kind, ChartKind::LineChart);
    assert_eq!(pipeline.store().list().unwrap(), ["Kho_histogram.png"]);
}

#[test]
fn test_unreadable_input_is_fatal() {
    let dir = tempdir().unwrap();
    let input = upload(&dir, "broken.xlsx");
    std::fs::write(&input, b"this is not a spreadsheet").unwrap();

    let pipeline = Pipeline::new(config(&dir)).unwrap();
    let err = pipeline.run(&input).unwrap_err();
    assert!(err.is_fatal());
    assert!(matches!(err, VizError::Sheet(_)));
    assert!(pipeline.store().list().unwrap().is_empty());
}

#[test]
fn test_cleaned_copy_can_be_disabled() {
    let dir = tempdir().unwrap();
    let input = upload(&dir, "sales.xlsx");
    write_sales(&input);

    let pipeline = Pipeline::new(PipelineConfig {
        write_cleaned: false,
        ..config(&dir)
    })
    .unwrap();
    let report = pipeline.run(&input).unwrap();
    assert!(report.cleaned_path.is_none());
    assert!(!dir.path().join("uploads/sales_Cleaned.xlsx").exists());
    assert_eq!(report.chart_count(), 3);

    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["sheets"][0]["charts"][0]["artifact"]["kind"], "histogram");
}
