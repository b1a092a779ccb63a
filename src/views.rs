//! Server-rendered pages. Markup is assembled with `format!`, every
//! user-supplied string goes through [`escape`].

use crate::flash::Flash;
use crate::models::VideoRecord;

pub fn escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Percent-encode a file name for use as a single path segment.
pub fn url_segment(input: &str) -> String {
    urlencoding::encode(input).into_owned()
}

fn layout(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"ru\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>{}</title>\n</head>\n<body>\n\
         <nav><a href=\"/\">Главная</a> | <a href=\"/upload\">Загрузить</a> | <a href=\"/admin\">Админ</a></nav>\n\
         {}\n</body>\n</html>\n",
        escape(title),
        body
    )
}

fn preview_img(video: &VideoRecord) -> String {
    match &video.preview {
        Some(preview) => format!(
            "<img src=\"/media/previews/{}\" alt=\"{}\" width=\"320\">",
            url_segment(preview),
            escape(video.display_title())
        ),
        None => String::new(),
    }
}

pub fn index(videos: &[VideoRecord]) -> String {
    let mut body = String::from("<h1>Видео</h1>\n");
    if videos.is_empty() {
        body.push_str("<p>Пока нет загруженных видео.</p>\n");
    }
    body.push_str("<ul>\n");
    for video in videos {
        body.push_str(&format!(
            "<li><a href=\"/video/{}\">{}<br>{}</a></li>\n",
            url_segment(&video.filename),
            preview_img(video),
            escape(video.display_title())
        ));
    }
    body.push_str("</ul>");
    layout("Видео", &body)
}

pub fn upload_form() -> String {
    layout(
        "Загрузить видео",
        "<h1>Загрузить видео</h1>\n\
         <form method=\"post\" action=\"/upload\" enctype=\"multipart/form-data\">\n\
         <p><label>Название <input type=\"text\" name=\"title\"></label></p>\n\
         <p><label>Видео <input type=\"file\" name=\"video\" accept=\".mp4,.webm,.ogg\"></label></p>\n\
         <p><label>Превью <input type=\"file\" name=\"preview\" accept=\".jpg,.jpeg,.png\"></label></p>\n\
         <p><button type=\"submit\">Загрузить</button></p>\n\
         </form>",
    )
}

pub fn video(video: &VideoRecord) -> String {
    let poster = video
        .preview
        .as_deref()
        .map(|p| format!(" poster=\"/media/previews/{}\"", url_segment(p)))
        .unwrap_or_default();
    let body = format!(
        "<h1>{}</h1>\n<video controls width=\"640\"{}>\n\
         <source src=\"/media/videos/{}\">\n</video>",
        escape(video.display_title()),
        poster,
        url_segment(&video.filename)
    );
    layout(video.display_title(), &body)
}

pub fn admin(videos: &[VideoRecord], flash: Option<Flash>) -> String {
    let mut body = String::from("<h1>Управление видео</h1>\n");
    if let Some(flash) = flash {
        body.push_str(&format!(
            "<div class=\"flash {}\">{}</div>\n",
            flash.category(),
            escape(flash.message())
        ));
    }
    body.push_str("<table>\n<tr><th>Превью</th><th>Название</th><th>Файл</th><th></th></tr>\n");
    for video in videos {
        let segment = url_segment(&video.filename);
        body.push_str(&format!(
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>\
             <a href=\"/admin/edit/{}\">Редактировать</a> \
             <form method=\"post\" action=\"/admin/delete/{}\" style=\"display:inline\">\
             <button type=\"submit\">Удалить</button></form></td></tr>\n",
            preview_img(video),
            escape(video.display_title()),
            escape(&video.filename),
            segment,
            segment
        ));
    }
    body.push_str("</table>");
    layout("Управление видео", &body)
}

pub fn edit_form(video: &VideoRecord) -> String {
    let body = format!(
        "<h1>Редактировать видео</h1>\n{}\n\
         <form method=\"post\" action=\"/admin/edit/{}\" enctype=\"multipart/form-data\">\n\
         <p><label>Название <input type=\"text\" name=\"title\" value=\"{}\"></label></p>\n\
         <p><label>Новое превью <input type=\"file\" name=\"preview\" accept=\".jpg,.jpeg,.png\"></label></p>\n\
         <p><button type=\"submit\">Сохранить</button></p>\n\
         </form>",
        preview_img(video),
        url_segment(&video.filename),
        escape(video.display_title())
    );
    layout("Редактировать видео", &body)
}
