//! Canned content served by the offline demo collaborator.

use crate::model::{RawGeneration, Section, StructuredDocument};

pub const DEMO_TITLE: &str = "10 Innovative Strategies to Boost Your Social Media Presence 🚀";

pub const DEMO_SOCIAL_POST: &str = "🔥 Hot Take: Social Media Success Isn't About Luck, It's About Strategy! 🎯

Are you struggling to make an impact on social media? It's time to level up your game! 💪

Here are 3 game-changing strategies that successful brands are using right now:

1️⃣ User-Generated Content: Turn your followers into your best marketers!
2️⃣ Consistent Posting: Keep your audience engaged with a rock-solid schedule.
3️⃣ Interactive Features: Stories, polls, live videos - get your audience involved!

Want to learn more? Check out my latest blog post for a deep dive into these strategies and more!

#SocialMediaStrategy #DigitalMarketing #BrandGrowth

What's your biggest social media challenge? Drop a comment below! 👇";

pub fn demo_document() -> StructuredDocument {
    StructuredDocument {
        title: DEMO_TITLE.to_string(),
        sections: vec![
            Section::new(
                "1. Leverage User-Generated Content 📸",
                "Encourage your followers to create and share content related to your brand. This not only increases engagement but also provides you with a wealth of authentic material to reshare.",
            ),
            Section::new(
                "2. Implement a Consistent Posting Schedule ⏰",
                "Maintain a regular posting schedule to keep your audience engaged and increase your visibility on social media platforms. Use scheduling tools to plan your content in advance.",
            ),
            Section::new(
                "3. Utilize Interactive Features 🎭",
                "Make use of platform-specific features like Instagram Stories, Twitter Polls, or Facebook Live to create interactive experiences for your audience.",
            ),
        ],
        conclusion: "By implementing these strategies, you can significantly enhance your social media presence and connect with your audience on a deeper level. Remember, consistency and authenticity are key to long-term success on social media platforms.".to_string(),
    }
}

/// The demo payload in wire form: the blog as a pretty-printed JSON string.
pub fn canned_generation() -> Result<RawGeneration, serde_json::Error> {
    Ok(RawGeneration {
        blog: serde_json::to_string_pretty(&demo_document())?,
        social: DEMO_SOCIAL_POST.to_string(),
    })
}
