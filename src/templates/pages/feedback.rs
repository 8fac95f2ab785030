use crate::domain::feedback::{FeedbackInput, FeedbackType};
use crate::templates::{components::error_list, desktop_layout};
use maud::{html, Markup};

pub struct FeedbackFormVm<'a> {
    pub input: &'a FeedbackInput,
    pub errors: &'a [String],
    pub submitted: bool,
}

pub fn feedback_page(vm: &FeedbackFormVm) -> Markup {
    let input = vm.input;
    let rating = input.rating.unwrap_or(5);

    desktop_layout(
        "Feedback",
        false,
        html! {
            main class="container narrow" {
                h1 { "Feedback" }

                @if vm.submitted {
                    div class="card success" {
                        p { "Thank you! Your feedback has been received." }
                    }
                } @else {
                    (error_list(vm.errors))

                    form method="post" action="/feedback" class="card" {
                        label for="name" { "Name" }
                        input id="name" name="name" value=(input.name) required;

                        label for="email" { "Email" }
                        input id="email" type="email" name="email" value=(input.email) required;

                        label for="phone" { "Phone (optional)" }
                        input id="phone" name="phone" value=(input.phone);

                        label for="rating" { "Rating" }
                        select id="rating" name="rating" {
                            @for r in 1..=5i64 {
                                option value=(r) selected[r == rating] { (r) }
                            }
                        }

                        label for="type" { "Type" }
                        select id="type" name="type" {
                            @for t in FeedbackType::ALL {
                                option value=(t.as_str()) selected[input.feedback_type == t.as_str()] { (t.label()) }
                            }
                        }

                        label for="subject" { "Subject" }
                        input id="subject" name="subject" value=(input.subject) required;

                        label for="message" { "Message" }
                        textarea id="message" name="message" rows="5" required { (input.message) }

                        button type="submit" { "Send" }
                    }
                }
            }
        },
    )
}
