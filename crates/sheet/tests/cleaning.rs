use sheetviz_sheet::{clean, CellValue, RawSheet};

fn s(v: &str) -> CellValue {
    CellValue::from(v)
}

fn samples() -> Vec<RawSheet> {
    vec![
        RawSheet::from_data(vec![vec!["A", "B"], vec!["1", "2"], vec!["3", "4"]]),
        RawSheet::from_data(vec![vec!["A", ""], vec!["1", "2"]]),
        RawSheet::from_data(vec![
            vec!["", "", "", ""],
            vec!["", "Sản phẩm", "Số lượng", ""],
            vec!["", "Bút", "3", ""],
            vec!["", "", "7", ""],
            vec!["", "Bút", "3", ""],
            vec!["", "Vở", "", ""],
        ]),
        RawSheet::from_data(vec![vec!["Qty", "Qty"], vec!["1", "2"], vec!["1", "2"]]),
        RawSheet::from_data(vec![vec!["Header", "Other"]]),
        RawSheet::from_data::<&str>(vec![]),
        RawSheet::new(
            "Mixed",
            vec![
                vec![CellValue::Null, s("x"), CellValue::Int(1)],
                vec![CellValue::Float(2.5), CellValue::Bool(true), CellValue::Null],
                vec![CellValue::Float(2.5), CellValue::Bool(true), CellValue::Null],
            ],
        ),
    ]
}

#[test]
fn test_header_promotion() {
    let table = clean(&RawSheet::from_data(vec![
        vec!["A", "B"],
        vec!["1", "2"],
        vec!["3", "4"],
    ]));
    assert_eq!(table.columns(), ["A", "B"]);
    assert_eq!(table.rows(), [vec![s("1"), s("2")], vec![s("3"), s("4")]]);
}

#[test]
fn test_conservative_header_rule() {
    let table = clean(&RawSheet::from_data(vec![vec!["A", ""], vec!["1", "2"]]));
    assert_eq!(table.columns(), ["Unnamed: 0", "Unnamed: 1"]);
    assert_eq!(table.rows()[0], vec![s("A"), CellValue::Null]);
}

#[test]
fn test_duplicate_removal_preserves_order() {
    let table = clean(&RawSheet::from_data(vec![
        vec!["id", "name"],
        vec!["1", "a"],
        vec!["2", "b"],
        vec!["1", "a"],
        vec!["3", "c"],
    ]));
    let ids: Vec<String> = table.rows().iter().map(|r| r[0].as_str()).collect();
    assert_eq!(ids, ["1", "2", "3"]);
}

#[test]
fn test_empty_column_removed_anywhere() {
    for position in 0..3 {
        let mut header = vec!["h1", "h2"];
        header.insert(position, "");
        let mut data = vec!["v1", "v2"];
        data.insert(position, "");

        let table = clean(&RawSheet::from_data(vec![header, data]));
        assert_eq!(table.columns(), ["h1", "h2"], "empty column at {position}");
        assert_eq!(table.rows(), [vec![s("v1"), s("v2")]]);
    }
}

#[test]
fn test_rows_without_key_are_dropped() {
    let table = clean(&RawSheet::from_data(vec![
        vec!["", "Sản phẩm", "Số lượng", ""],
        vec!["", "Bút", "3", ""],
        vec!["", "", "7", ""],
        vec!["", "Vở", "", ""],
    ]));
    assert_eq!(table.columns(), ["Sản phẩm", "Số lượng"]);
    assert_eq!(
        table.rows(),
        [vec![s("Bút"), s("3")], vec![s("Vở"), CellValue::Null]]
    );
}

#[test]
fn test_cleaning_is_idempotent() {
    for raw in samples() {
        let once = clean(&raw);
        let twice = clean(&once.to_raw(raw.name()));
        assert_eq!(once, twice, "sheet {:?}", raw.rows());
    }
}

#[test]
fn test_no_empty_rows_or_columns_remain() {
    for raw in samples() {
        let table = clean(&raw);
        for row in table.rows() {
            assert!(row.iter().any(|c| !c.is_empty()));
        }
        for (index, name) in table.columns().iter().enumerate() {
            let has_value = table.rows().iter().any(|r| !r[index].is_empty());
            assert!(has_value || !name.is_empty());
        }
    }
}
