use axum::{body::Body, response::Response};
use scraper::{ElementRef, Html, Selector};

pub(crate) async fn parse_html_document(response: Response<Body>) -> Html {
    let body = response.into_body();
    let body = axum::body::to_bytes(body, usize::MAX)
        .await
        .expect("Could not get response body");
    let text = String::from_utf8_lossy(&body).to_string();

    Html::parse_document(&text)
}

pub(crate) async fn parse_html_fragment(response: Response<Body>) -> Html {
    let body = response.into_body();
    let body = axum::body::to_bytes(body, usize::MAX)
        .await
        .expect("Could not get response body");
    let text = String::from_utf8_lossy(&body).to_string();

    Html::parse_fragment(&text)
}

#[track_caller]
pub(crate) fn assert_valid_html(html: &Html) {
    assert!(
        html.errors.is_empty(),
        "Got HTML parsing errors: {:?}",
        html.errors
    );
}

/// Get the body rows of the first table, asserting there are `want_row_count` of them.
#[track_caller]
pub(crate) fn must_get_table_rows(html: &Html, want_row_count: usize) -> Vec<ElementRef<'_>> {
    let table = html
        .select(&Selector::parse("table").unwrap())
        .next()
        .expect("Could not find table in HTML");
    let table_rows = table
        .select(&Selector::parse("tbody tr").unwrap())
        .collect::<Vec<_>>();

    assert_eq!(
        table_rows.len(),
        want_row_count,
        "want {want_row_count} table row, got {}",
        table_rows.len()
    );

    table_rows
}

/// The trimmed text of the row's `<th>` header cell.
#[track_caller]
pub(crate) fn row_header_text(row: &ElementRef<'_>) -> String {
    row.select(&Selector::parse("th").unwrap())
        .next()
        .expect("Could not find table header <th> in table row")
        .text()
        .collect::<String>()
        .trim()
        .to_owned()
}

/// The trimmed text of each `<td>` cell in the row.
pub(crate) fn cell_texts(row: &ElementRef<'_>) -> Vec<String> {
    row.select(&Selector::parse("td").unwrap())
        .map(|cell| cell.text().collect::<String>().trim().to_owned())
        .collect()
}
