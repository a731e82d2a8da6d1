//! End-to-end generation on a temporary content tree

use std::fs;
use std::path::Path;

use catpress::{Error, Press};

fn write(path: &Path, content: &str) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn fixture(root: &Path) {
    let content = root.join("content");
    write(
        &content.join("first-post/index.md"),
        r#"+++
title = "First post"
description = "Where it starts"
category = "blog"
date = 2024-01-01T09:00:00Z
tags = ["  meta ", "rust"]
+++
Hello from the **first** post.
"#,
    );
    write(
        &content.join("second-post/post.md"),
        r#"+++
title = "Second post"
category = "blog"
date = "2024-01-02"
tags = ["rust", "rust"]
+++
![diagram](diagram.svg)

![photo](photo.png)
"#,
    );
    write(&content.join("second-post/diagram.svg"), "<svg id=\"diagram\"></svg>");
    write(&content.join("second-post/photo.png"), "png bytes");
    write(
        &content.join("about/about.md"),
        "+++\ntitle = \"About\"\ndate = \"2023-12-31\"\n+++\nAbout me.\n",
    );
    write(&root.join("static/style.css"), "body { margin: 0 }");
}

#[test]
fn generates_full_site() {
    let dir = tempfile::tempdir().unwrap();
    fixture(dir.path());

    let press = Press::new(dir.path().join("content"), dir.path().join("public")).unwrap();
    let summary = press.generate().unwrap();
    assert_eq!(summary.pages, 3);
    assert_eq!(summary.categories, 2);
    assert_eq!(summary.tags, 2);
    assert_eq!(summary.static_files, 1);

    let public = dir.path().join("public");
    for file in [
        "index.html",
        "categories/blog/index.html",
        "categories/Uncategorized/index.html",
        "categories/blog/first-post/index.html",
        "categories/blog/second-post/index.html",
        "categories/blog/second-post/photo.png",
        "categories/Uncategorized/about/index.html",
        "tags/meta/index.html",
        "tags/rust/index.html",
        "static/style.css",
    ] {
        assert!(public.join(file).is_file(), "missing {}", file);
    }

    // svg is inlined, png referenced
    let second = fs::read_to_string(public.join("categories/blog/second-post/index.html")).unwrap();
    assert!(second.contains("<svg id=\"diagram\"></svg>"));
    assert!(second.contains("<img src='photo.png'"));

    // newest first on the homepage
    let home = fs::read_to_string(public.join("index.html")).unwrap();
    let second_at = home.find("Second post").unwrap();
    let first_at = home.find("First post").unwrap();
    let about_at = home.find("About").unwrap();
    assert!(second_at < first_at && first_at < about_at);

    // the duplicated tag lists its page once
    let rust = fs::read_to_string(public.join("tags/rust/index.html")).unwrap();
    assert_eq!(rust.matches("categories/blog/second-post/index.html").count(), 1);
}

#[test]
fn malformed_item_produces_no_output() {
    let dir = tempfile::tempdir().unwrap();
    fixture(dir.path());
    write(
        &dir.path().join("content/broken/index.md"),
        "title = \"no delimiters\"\n",
    );

    let press = Press::new(dir.path().join("content"), dir.path().join("public")).unwrap();
    let err = press.generate().unwrap_err();
    assert!(matches!(err, Error::MalformedContent { .. }));
    assert!(!dir.path().join("public").exists());
}

#[test]
fn publishing_over_the_content_is_refused() {
    let dir = tempfile::tempdir().unwrap();
    fixture(dir.path());

    let err = Press::new(dir.path().join("content"), dir.path()).unwrap_err();
    assert!(matches!(err, Error::Usage(_)));
    assert!(dir.path().join("content/first-post/index.md").is_file());
    assert!(dir.path().join("static/style.css").is_file());
}

#[test]
fn cross_links_use_encoded_names() {
    let dir = tempfile::tempdir().unwrap();
    write(
        &dir.path().join("content/sharp/index.md"),
        "+++\ntitle = \"Sharp\"\ndate = \"2024-05-01\"\ncategory = \"Q&A\"\ntags = [\"C#\", \"50%\"]\n+++\nbody\n",
    );

    let press = Press::new(dir.path().join("content"), dir.path().join("public")).unwrap();
    press.generate().unwrap();

    let public = dir.path().join("public");
    let page = fs::read_to_string(public.join("categories/Q&A/sharp/index.html")).unwrap();
    assert!(page.contains("href=\"/tags/C%23/index.html\""));
    assert!(page.contains("href=\"/tags/50%25/index.html\""));
    assert!(page.contains("href=\"/categories/Q%26A/index.html\""));
    assert!(public.join("tags/C#/index.html").is_file());
    assert!(public.join("tags/50%/index.html").is_file());
}

#[test]
fn custom_templates_and_config() {
    let dir = tempfile::tempdir().unwrap();
    fixture(dir.path());
    write(
        &dir.path().join("site.toml"),
        "title = \"Field Notes\"\nroot = \"/notes/\"\ndate_format = \"%Y-%m-%d\"\n",
    );
    write(
        &dir.path().join("templates/index.html"),
        "{{ config.title }}|{% for p in pages %}{{ p.date }} {{ config.root }}/{{ p.href }};{% endfor %}",
    );

    let press = Press::new(dir.path().join("content"), dir.path().join("public"))
        .unwrap()
        .with_config_file(dir.path().join("site.toml"))
        .unwrap()
        .with_templates_dir(dir.path().join("templates"))
        .unwrap();
    press.generate().unwrap();

    let home = fs::read_to_string(dir.path().join("public/index.html")).unwrap();
    assert_eq!(
        home,
        "Field Notes|2024-01-02 /notes/categories/blog/second-post;\
         2024-01-01 /notes/categories/blog/first-post;\
         2023-12-31 /notes/categories/Uncategorized/about;"
    );
}
