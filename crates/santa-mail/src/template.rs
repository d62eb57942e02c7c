use santa_core::Notice;

pub const SUBJECT: &str = "Your Secret Santa Assignment!";

/// Plain-text body revealing the giftee to the recipient.
pub fn render_body(notice: &Notice<'_>) -> String {
    format!(
        "Hello {}!\n\
         \n\
         Your Secret Santa assignment has been made!\n\
         \n\
         You are gifting to: {}\n\
         \n\
         Remember to keep this secret! \u{1F381}\n\
         \n\
         Happy gifting!\n",
        notice.recipient_name, notice.giftee_name
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn body_names_recipient_and_giftee() {
        let notice = Notice {
            recipient_email: "alice@example.com",
            recipient_name: "Alice",
            giftee_name: "Bob",
            giftee_email: "bob@example.com",
        };

        let body = render_body(&notice);
        assert!(body.starts_with("Hello Alice!\n\n"));
        assert!(body.contains("You are gifting to: Bob\n"));
        assert!(body.ends_with("Happy gifting!\n"));
        // The giftee's address stays out of the message.
        assert!(!body.contains("bob@example.com"));
    }
}
