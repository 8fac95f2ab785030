use crate::domain::phone::Operator;
use maud::{html, Markup, DOCTYPE};

const STYLES: &str = r#"
body { font-family: system-ui, sans-serif; margin: 0; color: #1f2937; background: #f9fafb; }
header { display: flex; align-items: center; justify-content: space-between; padding: 12px 24px; background: white; box-shadow: 0 1px 3px rgba(0,0,0,.1); }
header nav ul { display: flex; gap: 16px; list-style: none; margin: 0; padding: 0; }
header a { color: #374151; text-decoration: none; }
main.container { max-width: 1100px; margin: 24px auto; padding: 0 16px; }
.card { background: white; border-radius: 8px; padding: 16px; margin-bottom: 16px; box-shadow: 0 1px 2px rgba(0,0,0,.06); }
.listing-grid { display: grid; grid-template-columns: repeat(auto-fill, minmax(240px, 1fr)); gap: 16px; }
.listing { background: white; border-radius: 8px; padding: 16px; border: 1px solid #e5e7eb; }
.listing.gold { border-color: #f59e0b; }
.listing.premium { border-color: #7c3aed; }
.phone { font-size: 1.4rem; font-weight: 600; letter-spacing: .02em; }
mark { background: #fde68a; border-radius: 2px; }
.errors { color: #b91c1c; }
.pagination { display: flex; gap: 8px; margin: 24px 0; }
.pagination .current { font-weight: 700; }
table { width: 100%; border-collapse: collapse; }
th, td { padding: 8px; border-bottom: 1px solid #f3f4f6; text-align: left; }
"#;

pub fn desktop_layout(title: &str, is_admin: bool, content: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="az" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) " | Nomre Bazari" }
                style { (maud::PreEscaped(STYLES)) }
            }
            body {
                header {
                    a href="/" { strong { "Nomre Bazari" } }
                    nav {
                        ul {
                            li { a href="/" { "All numbers" } }
                            li { a href="/gold" { "Gold" } }
                            li { a href="/premium" { "Premium" } }
                            @for op in Operator::ALL {
                                li { a href=(format!("/numbers/{}", op.slug())) { (op.name()) } }
                            }
                            li { a href="/feedback" { "Feedback" } }
                            @if is_admin {
                                li { a href="/admin" { "Admin" } }
                            }
                        }
                    }
                    @if is_admin {
                        form method="post" action="/admin/logout" style="margin: 0;" {
                            button type="submit" { "Log out" }
                        }
                    }
                }
                (content)
            }
        }
    }
}
