use docx_mill::{config::Config, error::ConvertError, request::ConversionRequest};
use std::fs;
use std::path::Path;

#[test]
fn derives_output_alongside_input() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("report.pdf");
    fs::write(&input, b"%PDF-1.4").unwrap();

    let cfg = Config::default();
    let req = ConversionRequest::new(&cfg, &input, None).unwrap();

    assert_eq!(req.output_path.file_name().unwrap(), "report.docx");
    assert_eq!(
        req.output_path.parent().unwrap(),
        req.input.parent().unwrap()
    );
}

#[test]
fn explicit_out_dir_wins() {
    let dir = tempfile::tempdir().unwrap();
    let out = tempfile::tempdir().unwrap();
    let input = dir.path().join("report.pdf");
    fs::write(&input, b"%PDF-1.4").unwrap();

    let cfg = Config::default();
    let req = ConversionRequest::new(&cfg, &input, Some(out.path())).unwrap();

    assert_eq!(
        req.output_path,
        out.path().canonicalize().unwrap().join("report.docx")
    );
}

#[test]
fn same_input_maps_to_same_output() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("report.pdf");
    fs::write(&input, b"%PDF-1.4").unwrap();

    let cfg = Config::default();
    let a = ConversionRequest::new(&cfg, &input, None).unwrap();
    let b = ConversionRequest::new(&cfg, &input, None).unwrap();
    assert_eq!(a.output_path, b.output_path);
}

#[test]
fn missing_input_is_input_not_found() {
    let cfg = Config::default();
    let err = ConversionRequest::new(&cfg, Path::new("/no/such/file.pdf"), None).unwrap_err();
    assert!(matches!(err, ConvertError::InputNotFound(_)));
}

#[test]
fn url_inputs_are_rejected() {
    let cfg = Config::default();
    let err =
        ConversionRequest::new(&cfg, Path::new("https://example.com/a.pdf"), None).unwrap_err();
    assert!(err.to_string().contains("URL inputs are disabled"));
}
