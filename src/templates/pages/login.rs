use crate::templates::desktop_layout;
use maud::{html, Markup};

pub fn login_page(error: Option<&str>, enabled: bool) -> Markup {
    desktop_layout(
        "Admin sign in",
        false,
        html! {
            main class="container narrow" {
                h1 { "Admin sign in" }

                @if !enabled {
                    p class="errors" { "Admin login is disabled on this server." }
                } @else {
                    @if let Some(msg) = error {
                        p class="errors" { (msg) }
                    }
                    form method="post" action="/admin/login" class="card" {
                        label for="password" { "Password" }
                        input id="password" type="password" name="password" autocomplete="current-password" required;
                        button type="submit" { "Sign in" }
                    }
                }
            }
        },
    )
}
