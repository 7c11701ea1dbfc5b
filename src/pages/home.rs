//! Marketing landing page. Static content only; nothing here touches the
//! session machinery.

use leptos::prelude::*;

struct Pillar {
    title: &'static str,
    subtitle: &'static str,
    description: &'static str,
}

const PILLARS: &[Pillar] = &[
    Pillar {
        title: "PERSONALISED ASSESSMENT FIRST",
        subtitle: "Your journey starts with understanding YOU.",
        description: "Book a posture, movement, and health assessment online or at \
                      our facility. Your goals, restrictions, and current fitness \
                      levels shape a completely personalised fitness roadmap.",
    },
    Pillar {
        title: "CHOOSE HOW YOU TRAIN",
        subtitle: "Flexibility that fits your life.",
        description: "Physical sessions at our facility, live online training with \
                      our expert coaches, or self-paced training through the TFC \
                      app with guided plans.",
    },
    Pillar {
        title: "FULLY CUSTOMISED PLAN",
        subtitle: "No copy-paste routines here.",
        description: "Our experts create personalised workout and nutrition plans \
                      tailored to your needs, and the plans evolve with your \
                      progress.",
    },
    Pillar {
        title: "CONTINUOUS PROGRESS MONITORING",
        subtitle: "We stay with you, every rep of the way.",
        description: "Track workouts, upload exercise videos for expert feedback, \
                      log meals for nutritionist review, and book weekly reviews \
                      with your trainer.",
    },
];

#[component]
pub fn HomePage() -> impl IntoView {
    view! {
        <section class="hero">
            <h1 class="hero__title">"THE FITNESS CLUB"</h1>
            <p class="hero__tagline">"Train your way. Coached every step."</p>
            <a href="/packages" class="hero__cta">
                "View Packages"
            </a>
        </section>
        <section class="pillars">
            {PILLARS
                .iter()
                .map(|pillar| {
                    view! {
                        <article class="pillar">
                            <h2 class="pillar__title">{pillar.title}</h2>
                            <h3 class="pillar__subtitle">{pillar.subtitle}</h3>
                            <p class="pillar__description">{pillar.description}</p>
                        </article>
                    }
                })
                .collect_view()}
        </section>
    }
}
