#![allow(missing_docs)]

pub(crate) mod fixtures;
pub(crate) mod form;
pub(crate) mod html;
pub(crate) mod http;

pub(crate) use fixtures::{
    get_test_connection, must_create_class, must_create_event, must_create_expense,
    must_create_payment, must_create_staff, must_create_student, must_enroll,
};
pub(crate) use form::{assert_form_input, assert_hx_endpoint, must_get_form};
pub(crate) use html::{
    assert_valid_html, cell_texts, must_get_table_rows, parse_html_document, parse_html_fragment,
    row_header_text,
};
pub(crate) use http::{
    assert_content_type, assert_hx_redirect, assert_status_ok, get_header, parse_json,
};
