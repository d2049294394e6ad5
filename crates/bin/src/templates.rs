//! HTML templates for the web interface
//!
//! Simple inline HTML templates without a template engine.

use bookbinder::dynlist::ItemKey;
use bookbinder::form::{AuthorForm, BookForm, FieldError};
use bookbinder::model::Author;

use crate::antiforgery::TOKEN_FIELD;

/// Common CSS styles for all pages
const COMMON_STYLES: &str = r#"
    body {
        font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", Roboto, "Helvetica Neue", Arial, sans-serif;
        max-width: 900px;
        margin: 40px auto;
        padding: 0 20px;
        background: #f5f5f5;
    }
    .container {
        background: white;
        padding: 30px;
        border-radius: 8px;
        box-shadow: 0 2px 4px rgba(0,0,0,0.1);
    }
    h1 {
        color: #333;
        border-bottom: 2px solid #0066cc;
        padding-bottom: 10px;
    }
    h2 {
        color: #555;
        margin-top: 30px;
    }
    .info-row {
        margin: 10px 0;
        padding: 8px;
        background: #f9f9f9;
        border-radius: 4px;
    }
    .label {
        font-weight: bold;
        color: #666;
        display: inline-block;
        width: 150px;
    }
    .value {
        color: #0066cc;
    }
    form {
        margin: 20px 0;
    }
    .form-group {
        margin: 15px 0;
    }
    label {
        display: block;
        font-weight: bold;
        margin-bottom: 5px;
        color: #333;
    }
    input[type="text"] {
        width: 100%;
        padding: 10px;
        border: 1px solid #ddd;
        border-radius: 4px;
        font-size: 14px;
        box-sizing: border-box;
    }
    button {
        background: #0066cc;
        color: white;
        padding: 10px 20px;
        border: none;
        border-radius: 4px;
        cursor: pointer;
        font-size: 14px;
        font-weight: bold;
    }
    button:hover {
        background: #0052a3;
    }
    .book-item {
        margin: 15px 0;
        padding: 15px;
        border: 1px solid #ddd;
        border-radius: 4px;
        background: #fafafa;
    }
    .remove-book {
        background: #d9534f;
        padding: 6px 14px;
        font-size: 13px;
    }
    .remove-book:hover {
        background: #b52b27;
    }
    .danger {
        background: #d9534f;
    }
    .danger:hover {
        background: #b52b27;
    }
    table {
        width: 100%;
        border-collapse: collapse;
        margin: 20px 0;
    }
    th, td {
        text-align: left;
        padding: 12px;
        border-bottom: 1px solid #ddd;
    }
    th {
        background: #f0f0f0;
        font-weight: bold;
        color: #333;
    }
    tr:hover {
        background: #f9f9f9;
    }
    .error {
        color: #d9534f;
        background: #f2dede;
        padding: 10px;
        border-radius: 4px;
        margin: 10px 0;
    }
    a {
        color: #0066cc;
        text-decoration: none;
    }
"#;

/// Client-side helper for the dynamic book list: fetches one blank item
/// fragment from the server and splices it into the list container,
/// without reloading the page or losing in-progress edits.
const DYNAMIC_LIST_SCRIPT: &str = r#"
let nextKey = __NEXT_KEY__;
async function addBook() {
    const params = new URLSearchParams({
        container_id: 'books-list',
        list_path: 'books',
        key: nextKey,
    });
    const response = await fetch('/authors/books/new?' + params);
    if (!response.ok) {
        return;
    }
    document.getElementById('books-list').insertAdjacentHTML('beforeend', await response.text());
    nextKey += 1;
}
function removeBook(key) {
    const row = document.getElementById('book-item-' + key);
    if (row) {
        row.remove();
    }
}
"#;

/// Render the author list page
pub fn authors_index_page(authors: &[Author]) -> String {
    let authors_html = if authors.is_empty() {
        r#"<p style="color: #666; font-style: italic;">No authors yet.</p>"#.to_string()
    } else {
        let rows: String = authors
            .iter()
            .map(|author| {
                format!(
                    r#"<tr>
                    <td>{}</td>
                    <td>{}</td>
                    <td>
                        <a href="/authors/{id}">Details</a> |
                        <a href="/authors/{id}/edit">Edit</a> |
                        <a href="/authors/{id}/delete">Delete</a>
                    </td>
                </tr>"#,
                    html_escape(&author.full_name()),
                    author.books.len(),
                    id = author.id,
                )
            })
            .collect();

        format!(
            r#"<table>
            <tr>
                <th>Name</th>
                <th>Books</th>
                <th>Actions</th>
            </tr>
            {rows}
        </table>"#
        )
    };

    format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8">
    <title>Bookbinder - Authors</title>
    <style>{COMMON_STYLES}</style>
</head>
<body>
    <div class="container">
        <h1>Authors</h1>
        {authors_html}
        <p><a href="/authors/new">Create new author</a></p>
    </div>
</body>
</html>"#
    )
}

/// Render the author detail page
pub fn author_detail_page(author: &Author) -> String {
    let books_html = if author.books.is_empty() {
        r#"<p style="color: #666; font-style: italic;">No books recorded.</p>"#.to_string()
    } else {
        let rows: String = author
            .books
            .iter()
            .map(|book| {
                format!(
                    r#"<tr><td>{}</td><td>{}</td></tr>"#,
                    html_escape(&book.title),
                    html_escape(&book.publication_year),
                )
            })
            .collect();
        format!(
            r#"<table>
            <tr><th>Title</th><th>Publication year</th></tr>
            {rows}
        </table>"#
        )
    };

    format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8">
    <title>Bookbinder - {name}</title>
    <style>{COMMON_STYLES}</style>
</head>
<body>
    <div class="container">
        <h1>{name}</h1>
        <div class="info-row">
            <span class="label">First name:</span>
            <span class="value">{first}</span>
        </div>
        <div class="info-row">
            <span class="label">Last name:</span>
            <span class="value">{last}</span>
        </div>
        <h2>Authored books</h2>
        {books_html}
        <p>
            <a href="/authors/{id}/edit">Edit</a> |
            <a href="/authors">Back to list</a>
        </p>
    </div>
</body>
</html>"#,
        name = html_escape(&author.full_name()),
        first = html_escape(&author.first_name),
        last = html_escape(&author.last_name),
        id = author.id,
    )
}

/// Which flow an author form serves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit,
}

/// Render the author form page (create and edit flows).
///
/// The book list is rendered through the same fragment the dynamic-item
/// endpoint returns, so server-rendered and client-added rows submit
/// identically.
pub fn author_form_page(
    mode: FormMode,
    form: &AuthorForm,
    errors: &[FieldError],
    csrf_token: &str,
) -> String {
    let (title, action) = match mode {
        FormMode::Create => ("New Author".to_string(), "/authors/new".to_string()),
        FormMode::Edit => (
            "Edit Author".to_string(),
            format!("/authors/{}/edit", form.id),
        ),
    };

    let errors_html = if errors.is_empty() {
        String::new()
    } else {
        let items: String = errors
            .iter()
            .map(|e| {
                format!(
                    "<li>{}: {}</li>",
                    html_escape(&e.field),
                    html_escape(&e.message)
                )
            })
            .collect();
        format!(r#"<div class="error"><ul>{items}</ul></div>"#)
    };

    let books_html: String = form
        .books
        .iter()
        .map(|(key, book)| book_item_fragment(&format!("books[{key}]"), key, book))
        .collect();

    let script = DYNAMIC_LIST_SCRIPT.replace("__NEXT_KEY__", &form.books.next_key().to_string());

    format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8">
    <title>Bookbinder - {title}</title>
    <style>{COMMON_STYLES}</style>
</head>
<body>
    <div class="container">
        <h1>{title}</h1>
        {errors_html}
        <form method="POST" action="{action}">
            <input type="hidden" name="{token_field}" value="{token}">
            <input type="hidden" name="id" value="{id}">
            <div class="form-group">
                <label for="first_name">First name:</label>
                <input type="text" id="first_name" name="first_name" value="{first}" autofocus>
            </div>
            <div class="form-group">
                <label for="last_name">Last name:</label>
                <input type="text" id="last_name" name="last_name" value="{last}">
            </div>
            <h2>Authored books</h2>
            <div id="books-list">
                {books_html}
            </div>
            <p><button type="button" onclick="addBook()">Add book</button></p>
            <p><button type="submit">Save</button> <a href="/authors">Cancel</a></p>
        </form>
    </div>
    <script>{script}</script>
</body>
</html>"#,
        token_field = TOKEN_FIELD,
        token = html_escape(csrf_token),
        id = form.id,
        first = html_escape(&form.first_name),
        last = html_escape(&form.last_name),
    )
}

/// Render the delete confirmation page
pub fn delete_confirm_page(author: &Author, csrf_token: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8">
    <title>Bookbinder - Delete Author</title>
    <style>{COMMON_STYLES}</style>
</head>
<body>
    <div class="container">
        <h1>Delete Author</h1>
        <p>Are you sure you want to delete <strong>{name}</strong>
        and the {count} book(s) they authored?</p>
        <form method="POST" action="/authors/{id}/delete">
            <input type="hidden" name="{token_field}" value="{token}">
            <button type="submit" class="danger">Delete</button>
            <a href="/authors">Cancel</a>
        </form>
    </div>
</body>
</html>"#,
        name = html_escape(&author.full_name()),
        count = author.books.len(),
        id = author.id,
        token_field = TOKEN_FIELD,
        token = html_escape(csrf_token),
    )
}

/// Render one editable book row.
///
/// Used both when rendering the whole form and as the fragment the
/// dynamic-item endpoint returns; input names carry the supplied
/// field-name prefix so the row submits as part of the parent form.
pub fn book_item_fragment(field_prefix: &str, key: ItemKey, book: &BookForm) -> String {
    let prefix = html_escape(field_prefix);
    format!(
        r#"<div class="book-item" id="book-item-{key}">
    <input type="hidden" name="{prefix}.id" value="{id}">
    <div class="form-group">
        <label>Title:</label>
        <input type="text" name="{prefix}.title" value="{title}">
    </div>
    <div class="form-group">
        <label>Publication year:</label>
        <input type="text" name="{prefix}.publication_year" value="{year}">
    </div>
    <button type="button" class="remove-book" onclick="removeBook({key})">Remove</button>
</div>"#,
        id = book.id,
        title = html_escape(&book.title),
        year = html_escape(&book.publication_year),
    )
}

/// Escape HTML special characters
fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}
