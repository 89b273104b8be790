//! Static answer tables. Order matters everywhere in this file: every lookup
//! takes the first match.

/// Canonical questions (already normalized) and their answers.
pub const CANONICAL_ANSWERS: &[(&str, &str)] = &[
    (
        "tell me about your ai expertise",
        "While it has always been forcus on hunan-centered design. Gained good traction in understanding and building AI-first products and have been exploring AI capabilities. I've created user-friendly interfaces for complex AI systems across fintech, healthcare, and insurance applications. My approach focuses on making AI transparent and trustworthy while augmenting human creativity rather than replacing it.",
    ),
    (
        "what's your design philosophy",
        "My approach is rooted in human-centered design, blending empathy with the power of AI and 'vibe coding' to turn ideas into products that truly resonate with users and are ready for the market. I believe in designing with code, using data-driven decisions enhanced by user empathy, and creating accessible, inclusive experiences.",
    ),
    (
        "how do you bring ideas to products",
        "I follow a systematic Ideate → Strategize → Launch methodology. I start with deep user research, prototype rapidly with code, iterate based on feedback, and deliver market-ready products. I've successfully brought 24 ideas from concept to marketable products using this approach combined with AI-first thinking.",
    ),
    (
        "what's your design process",
        "Every project starts with understanding people. Even as AI evolves, I believe we're designing for humans first. My process is simple: Ideate → Strategize → Launch. I begin with user research, prototype with 'vibe coding', and deliver working products through a systematic, iterative approach.",
    ),
    (
        "what else can you do besides work",
        "I'm a creative artist who does oil painting, outdoor enthusiast passionate about hiking and casual motorcycle rides, and a home improvement expert who's completed tons of DIY projects. I've built metaverse spaces, fly drones as a hobby, use AI for social media content creation, and apply design thinking to everyday life challenges. There are many interests and experiences I have that you can discover through our conversation!",
    ),
    (
        "what technologies do you understand",
        "I specialize in  Human-centered design, keeping users at the center and leveraging AI to enhance the design process and experience. My design process is powered by Figma, Miro, FigJam, and AI-driven design platforms. I also have understanding of full-stack development and CRM systems Salesforce capabilities to craft seamless digital experiences.",
    ),
    (
        "tell me about your learning journey",
        "After spending thousands of hours in explorative learning, I personally believe I believe in reinforcing knowledge through practical application and 'learning by doing'. I have 255+ Salesforce badges, 99 LinkedIn Learning courses, and multiple certifications across Microsoft and SAP.",
    ),
];

/// How a rule tests the normalized question.
#[derive(Debug, Clone, Copy)]
pub enum Keywords {
    /// Every keyword must appear.
    All(&'static [&'static str]),
    /// At least one keyword must appear.
    Any(&'static [&'static str]),
}

impl Keywords {
    pub fn matches(&self, text: &str) -> bool {
        match self {
            Self::All(words) => words.iter().all(|w| text.contains(w)),
            Self::Any(words) => words.iter().any(|w| text.contains(w)),
        }
    }
}

/// Keyword heuristics routing to a canonical question of [`CANONICAL_ANSWERS`].
pub const KEYWORD_RULES: &[(Keywords, &str)] = &[
    (
        Keywords::All(&["ai", "expertise"]),
        "tell me about your ai expertise",
    ),
    (
        Keywords::All(&["design", "philosophy"]),
        "what's your design philosophy",
    ),
    (
        Keywords::All(&["ideas", "product"]),
        "how do you bring ideas to products",
    ),
    (Keywords::Any(&["process"]), "what's your design process"),
    (
        Keywords::Any(&["besides work", "outside work", "personal"]),
        "what else can you do besides work",
    ),
    (
        Keywords::Any(&["technolog", "skills"]),
        "what technologies do you understand",
    ),
    (
        Keywords::All(&["learning", "journey"]),
        "tell me about your learning journey",
    ),
];

/// Personality and topic flavoured answers used when the completion service
/// fails. Keys are matched as substrings of the lowercased question.
pub const FALLBACK_ANSWERS: &[(&str, &str)] = &[
    (
        "family",
        "My family tree is more like a design system - well-structured, documented, and occasionally needs refactoring! 😄 But seriously, I prefer to keep family details private while we chat about design and tech.",
    ),
    (
        "address",
        "I live at 127.0.0.1 - localhost! 😂 But for real conversations, let's stick to talking about design, AI, and creative projects rather than personal addresses.",
    ),
    (
        "salary",
        "My salary is measured in creative satisfaction and successful product launches! 💰 Let's talk about the value I bring through design and AI expertise instead.",
    ),
    (
        "manager",
        "My manager is my curiosity and passion for great design! 🎨 I'm self-directed when it comes to learning and creating. Want to discuss leadership and team dynamics instead?",
    ),
    (
        "phone",
        "My phone number is 1-800-DESIGN! 📱 But honestly, let's keep our chat focused on professional topics - I'm here to discuss design, AI, and product development.",
    ),
    (
        "age",
        "I'm old enough to remember when 'responsive design' meant answering emails quickly! 😅 Age is just a number - what matters is staying current with design trends and AI innovations.",
    ),
    (
        "personal",
        "I keep my personal life as private as my GitHub repos! 🔒 But I'm totally open about discussing my professional journey, creative projects, and design philosophy.",
    ),
    (
        "what else",
        "I actually have way more skills and an interesting personality beyond just work! I'm an artist who loves hiking, biking, motorcycle riding, and I've done tons of home improvement projects. I'm also creative in using AI for social media generation and expert at applying knowledge through process reinforcement.",
    ),
    (
        "hobbies",
        "Beyond design and tech, I'm passionate about motorcycle adventures, hiking trails, creative art projects, and home renovations. I love applying systematic thinking to everything - from DIY projects to exploring new AI tools for creative content.",
    ),
    (
        "personality",
        "I'm someone who brings creativity and adventure into everything I do. Whether it's designing AI interfaces, renovating my home, or exploring mountain trails on my bike, I approach life with curiosity and systematic problem-solving.",
    ),
    (
        "creative",
        "I explore various art forms and use AI innovatively for social media content creation. My creative side complements my technical skills - I see design as both art and science.",
    ),
    (
        "motorcycle",
        "I'm passionate about long-distance motorcycle riding! It combines my love for adventure, mechanical understanding, and the freedom to explore. There's something about the open road that sparks creativity.",
    ),
    (
        "home improvement",
        "I've completed tons of DIY projects using systematic problem-solving approaches. I apply the same design thinking methodology to home renovations as I do to product development - research, prototype, iterate, deliver!",
    ),
    (
        "learning",
        "I'm expert at reinforcing what I learn through practical application. Every course, every new skill gets tested in real projects. That's how I've maintained 350+ hours of learning annually while actually retaining and using the knowledge.",
    ),
    (
        "ai social media",
        "I've been exploring creative ways to use AI for social media content generation. It's fascinating how AI can augment human creativity rather than replace it - I use it as a creative partner in content strategy.",
    ),
    (
        "design systems",
        "I've built 50+ component design systems for enterprise applications. My approach focuses on scalability, accessibility (WCAG 2.1 AA), and developer-designer collaboration. Each system is like building a creative language for teams.",
    ),
    (
        "accessibility",
        "Accessibility isn't just compliance for me - it's about inclusive design that works for everyone. I've implemented WCAG 2.1 AA standards across multiple products, believing that good design should be universally accessible.",
    ),
    (
        "voice ui",
        "Voice interface design fascinates me because it's purely conversational - no visual crutches. I've worked on voice AI systems where the entire experience depends on understanding human conversation patterns and natural language flow.",
    ),
    (
        "prototyping",
        "I believe in 'vibe coding' - rapid prototyping that captures the feel of an idea quickly. Whether it's Figma, React, or even physical mockups for home projects, prototyping is how ideas become reality.",
    ),
    (
        "hackathons",
        "Winning the Generative AI Design Hackathon was incredible! It validated my approach of combining human-centered design with AI capabilities. Hackathons are where creativity meets rapid execution.",
    ),
    (
        "startup",
        "I've been part of multiple startup journeys, understanding the unique challenges of building products with limited resources. It taught me to be scrappy, strategic, and user-focused from day one.",
    ),
];

/// Broader topic answers tried after [`FALLBACK_ANSWERS`] misses.
pub const TOPIC_RULES: &[(Keywords, &str)] = &[
    (
        Keywords::Any(&["design system", "component library"]),
        "I've built scalable design systems for enterprise applications using atomic design principles. I focus on accessibility-first components and seamless design-to-code workflows. Would you like to discuss specific design system challenges?",
    ),
    (
        Keywords::Any(&["ai in design", "ai design", "artificial intelligence design"]),
        "I believe AI should augment human creativity, not replace it. I focus on designing ethical AI interfaces with transparency and user control. Let's chat about how AI can enhance your design process!",
    ),
    (
        Keywords::Any(&["accessibility", "a11y", "inclusive"]),
        "Accessibility is core to my design philosophy - I ensure WCAG compliance and inclusive design principles in all projects. I believe great design works for everyone. Want to discuss accessibility strategies?",
    ),
    (
        Keywords::Any(&["voice", "conversational", "chatbot"]),
        "I've designed conversational AI interfaces for healthcare and customer service applications. Voice UI requires different design thinking than visual interfaces. Let's explore conversational design principles!",
    ),
    (
        Keywords::Any(&["prototype", "figma", "framer"]),
        "I prototype with code using React and design tools like Figma and Framer. This approach helps validate technical feasibility early. Happy to discuss prototyping strategies that work for your team!",
    ),
    (
        Keywords::Any(&["experience", "background"]),
        "I have 5+ years as a Design Director specializing in AI-first products, bringing 24 ideas to market. My approach combines strategic design with hands-on development. What specific aspect interests you most?",
    ),
    (
        Keywords::Any(&["ai", "artificial intelligence", "machine learning"]),
        "I specialize in designing user-friendly interfaces for complex AI systems, from LLMs to computer vision. My focus is making AI accessible and trustworthy. Let's discuss your AI design challenges!",
    ),
    (
        Keywords::Any(&["projects", "portfolio", "work"]),
        "I've delivered projects across fintech, healthcare, insurance, and entertainment - each focusing on solving real user problems with AI-enhanced experiences. Which industry or project type interests you?",
    ),
    (
        Keywords::Any(&["design", "process"]),
        "My process is Design → Develop → Deliver: user research, strategic design, code prototypes, and market-ready products. This end-to-end approach ensures ideas become reality. Want to dive deeper into any phase?",
    ),
    (
        Keywords::Any(&["learning", "education", "growth"]),
        "I invest 350+ hours annually in learning across Salesforce (255 badges), LinkedIn Learning (99 courses), and other platforms. Continuous learning keeps me current with AI and design evolution. What learning strategies work for you?",
    ),
    (
        Keywords::Any(&["technology", "tools", "tech stack"]),
        "I work with React, TypeScript, Python for AI/ML, plus design tools like Figma and Framer. My approach combines strategic design with technical implementation. What's your current tech stack?",
    ),
    (
        Keywords::Any(&["leadership", "team", "management"]),
        "I lead cross-functional teams through entire product lifecycles, from ideation to market launch. I believe in collaborative design and data-driven decisions. Let's discuss leadership challenges you're facing!",
    ),
    (
        Keywords::Any(&["hackathon", "competition"]),
        "I won the Generative AI Design Hackathon with TravelMate AI, a personalized travel companion. Hackathons are great for rapid innovation and testing new ideas. Have you participated in any design competitions?",
    ),
];

/// Last resort when nothing else matched.
pub const GENERIC_APOLOGY: &str = "While I'd love to share more specific insights about that topic, let's continue our conversation - I'm happy to dive deeper into any aspect of design, AI, or product development that interests you.";
