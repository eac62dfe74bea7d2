//! Structured topic profiles
//!
//! The `max` topic set describes each topic with a name, a one-sentence
//! description, the kinds of content it covers and sample page titles. The
//! profile is rendered into a single description string before it reaches the
//! prompt.

/// A structured topic description
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TopicProfile {
    pub key: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub includes: &'static [&'static str],
    pub examples: &'static [&'static str],
}

impl TopicProfile {
    /// Renders the profile as prompt text
    ///
    /// ```text
    /// Drugs: Content related to ...
    /// Includes:
    /// - Illegal drugs (...)
    /// Examples:
    /// - "How to grow marijuana at home"
    /// ```
    pub fn render(&self) -> String {
        let mut text = format!("{}: {}", self.name, self.description);

        if !self.includes.is_empty() {
            text.push_str("\nIncludes:");
            for item in self.includes {
                text.push_str("\n- ");
                text.push_str(item);
            }
        }

        if !self.examples.is_empty() {
            text.push_str("\nExamples:");
            for example in self.examples {
                text.push_str("\n- ");
                text.push_str(example);
            }
        }

        text
    }
}

pub const MAX_TOPICS: &[TopicProfile] = &[
    TopicProfile {
        key: "drugs",
        name: "Drugs",
        description: "Content related to substances that alter body or mind functions outside of medical supervision",
        includes: &[
            "Illegal drugs (heroin, cocaine, methamphetamine, etc.)",
            "Recreational drug use and experiences",
            "Psychedelic substances (LSD, psilocybin mushrooms, DMT, etc.)",
            "Drug production, trafficking, or distribution methods",
            "Drug paraphernalia and consumption techniques",
            "Non-prescribed use of prescription medications",
            "Drug addiction and substance abuse disorders",
            "Drug legalization/decriminalization debates",
            "Dark web marketplaces for substances",
        ],
        examples: &[
            "\"How to grow marijuana at home\"",
            "\"Trip report after taking MDMA\"",
            "\"Best ways to hide drugs from police\"",
            "\"Cocaine withdrawal symptoms\"",
        ],
    },
    TopicProfile {
        key: "tobacco",
        name: "Tobacco",
        description: "Content related to tobacco and nicotine products",
        includes: &[
            "Cigarettes, cigars, pipe tobacco, and smokeless tobacco",
            "Vaping and e-cigarette products, equipment, and liquids",
            "Tobacco industry practices and marketing",
            "Health effects of smoking and secondhand smoke",
            "Tobacco cessation methods and resources",
            "Pro-tobacco advocacy or normalization of tobacco use",
            "Hookah and water pipe use",
            "Underage access to tobacco products",
        ],
        examples: &[
            "\"Best vape juice flavors for cloud production\"",
            "\"How to roll your own cigarettes\"",
            "\"Hiding smoking from parents or authorities\"",
            "\"Tips for quitting nicotine\"",
        ],
    },
    TopicProfile {
        key: "weapon",
        name: "Weapons",
        description: "Content related to tools and devices designed to cause harm or injury",
        includes: &[
            "Firearms of all types (handguns, rifles, assault weapons, etc.)",
            "Ammunition and ballistics information",
            "Explosives, bomb-making materials or instructions",
            "Military-grade weapons and equipment",
            "Knives and bladed weapons (combat knives, switchblades, etc.)",
            "Improvised weapons and weaponization of everyday objects",
            "BB guns, airsoft guns, and replica weapons",
            "Weapon modification techniques or accessories",
            "Tactics for using weapons against others",
        ],
        examples: &[
            "\"How to modify a semi-automatic to fully automatic\"",
            "\"Building homemade silencers for firearms\"",
            "\"Best concealed carry methods\"",
            "\"Most lethal knife fighting techniques\"",
        ],
    },
    TopicProfile {
        key: "abortion",
        name: "Abortion",
        description: "Content related to the termination of pregnancy",
        includes: &[
            "Medical procedures for abortion (surgical and pharmaceutical)",
            "Legal status and restrictions on abortion access",
            "Pro-choice and pro-life viewpoints and advocacy",
            "Personal abortion experiences and testimonials",
            "Self-induced abortion methods or underground services",
            "Religious and ethical perspectives on abortion",
            "Abortion statistics and demographic information",
            "Post-abortion mental and physical health concerns",
        ],
        examples: &[
            "\"How to terminate a pregnancy at home\"",
            "\"Where to get an abortion without parental consent\"",
            "\"Religious arguments against abortion\"",
            "\"Post-abortion syndrome symptoms\"",
        ],
    },
    TopicProfile {
        key: "adult",
        name: "Adult Content",
        description: "Content of a sexual or pornographic nature intended for adults",
        includes: &[
            "Pornographic material or explicit sexual content",
            "Adult entertainment industry (performers, production, distribution)",
            "Strip clubs, adult venues, and sex shows",
            "Sex work, prostitution, and escort services",
            "Explicit sexual fetishes and paraphilias",
            "Sexual services advertisements or solicitation",
            "Adult dating sites and hookup culture",
            "Sexually explicit art, literature, or media",
        ],
        examples: &[
            "\"Best pornographic websites to visit\"",
            "\"How to find escort services nearby\"",
            "\"Explicit descriptions of sexual encounters\"",
            "\"Adult webcam performance tips\"",
        ],
    },
    TopicProfile {
        key: "alcohol",
        name: "Alcohol",
        description: "Content related to alcoholic beverages and drinking culture",
        includes: &[
            "Production, consumption, and effects of alcoholic beverages",
            "Promotion of excessive alcohol consumption",
            "Underage drinking and methods to obtain alcohol illegally",
            "Drinking games and binge drinking activities",
            "Home brewing and distillation methods",
            "Alcohol addiction and alcoholism",
            "Drinking and driving or other risky behaviors while intoxicated",
            "Cultural drinking practices and celebrations",
        ],
        examples: &[
            "\"How to get drunk quickly\"",
            "\"Ways to hide alcohol from parents\"",
            "\"Homebrewing high-proof spirits\"",
            "\"Drinking games for college parties\"",
        ],
    },
    TopicProfile {
        key: "gambling",
        name: "Gambling",
        description: "Content related to wagering money on games of chance or skill",
        includes: &[
            "Casino games (poker, blackjack, roulette, slot machines, etc.)",
            "Sports betting and race wagering",
            "Online gambling platforms and websites",
            "Lottery systems and scratch cards",
            "Gambling strategies and systems claiming guaranteed wins",
            "Gambling addiction and problem gambling",
            "Underground or illegal gambling operations",
            "Betting pools and fantasy sports with monetary stakes",
        ],
        examples: &[
            "\"How to beat the casino at blackjack\"",
            "\"Best offshore betting sites without verification\"",
            "\"Foolproof system for winning at roulette\"",
            "\"Running an illegal poker game\"",
        ],
    },
    TopicProfile {
        key: "games",
        name: "Games",
        description: "Content related to video games, board games, and gaming culture",
        includes: &[
            "Video games (console, PC, mobile) of various genres",
            "Gaming platforms and services",
            "Esports, competitive gaming, and tournaments",
            "Board games, card games, and tabletop RPGs",
            "Game development and design",
            "Game cheats, hacks, and unauthorized modifications",
            "Gaming communities and fan culture",
            "Game addiction and excessive gaming habits",
        ],
        examples: &[
            "\"How to install game cracks to avoid paying\"",
            "\"Using aimbots in competitive shooters\"",
            "\"Addictive mobile games with best monetization\"",
            "\"Games with most realistic violence\"",
        ],
    },
    TopicProfile {
        key: "lgbt",
        name: "LGBTQ+ Content",
        description: "Content related to lesbian, gay, bisexual, transgender, queer and related identities",
        includes: &[
            "LGBTQ+ rights, advocacy, and activism",
            "Gender identity and sexual orientation topics",
            "Coming out experiences and advice",
            "Transgender topics including transition processes",
            "LGBTQ+ relationships and family structures",
            "Pride events and LGBTQ+ culture",
            "Discrimination and challenges faced by LGBTQ+ individuals",
            "LGBTQ+ representation in media and society",
        ],
        examples: &[
            "\"How to know if you're transgender\"",
            "\"Coming out to religious parents\"",
            "\"Dating apps for LGBTQ+ teens\"",
            "\"Gender transition options without parental knowledge\"",
        ],
    },
    TopicProfile {
        key: "lingerie",
        name: "Lingerie",
        description: "Content related to intimate apparel and undergarments",
        includes: &[
            "Provocative or sexualized undergarments",
            "Lingerie modeling and photography",
            "Lingerie fashion shows and brands",
            "Adult-oriented intimate apparel",
            "Suggestive lingerie advertising",
            "Fetishized lingerie styles and materials",
            "Buying guides and reviews for intimate apparel",
            "Sexual contexts for lingerie use",
        ],
        examples: &[
            "\"Most revealing lingerie designs\"",
            "\"How to model lingerie for paying clients\"",
            "\"Lingerie that men find most arousing\"",
            "\"Teen-appropriate provocative underwear\"",
        ],
    },
    TopicProfile {
        key: "selfharm",
        name: "Self-Harm",
        description: "Content related to deliberately causing injury or pain to oneself",
        includes: &[
            "Methods, techniques, or tools for self-injury",
            "Cutting, burning, or other physical self-harm behaviors",
            "Glorification or romanticization of self-harm",
            "Pro-self-harm communities or encouragement",
            "Concealing self-harm from others",
            "Suicidal ideation, plans, or methods",
            "Eating disorders and dangerous weight control practices",
            "Dangerous challenges or activities that cause self-injury",
        ],
        examples: &[
            "\"Best places to cut yourself where nobody will see\"",
            "\"How to hide self-harm scars\"",
            "\"Ways to experience pain without leaving marks\"",
            "\"Pro-ana tips for extreme weight loss\"",
        ],
    },
    TopicProfile {
        key: "sexedu",
        name: "Sexual Education",
        description: "Content related to education about sexuality, sexual health, and reproduction",
        includes: &[
            "Sexual anatomy and physiology",
            "Contraception methods and pregnancy prevention",
            "STI/STD prevention, symptoms, and treatment",
            "Consent and healthy relationship dynamics",
            "Puberty and developmental sexual changes",
            "Safe sex practices and sexual health",
            "LGBTQ+ inclusive sexual education",
            "Family planning and reproductive health",
        ],
        examples: &[
            "\"How contraceptives prevent pregnancy\"",
            "\"Understanding consent in sexual relationships\"",
            "\"Signs and symptoms of common STIs\"",
            "\"Physical changes during puberty\"",
        ],
    },
    TopicProfile {
        key: "violence",
        name: "Violence",
        description: "Content depicting, promoting, or discussing physical harm or aggressive actions",
        includes: &[
            "Graphic depictions of violence or gore",
            "Promotion of violence against individuals or groups",
            "Fighting techniques designed to cause serious injury",
            "Terrorist activities or extremist violence",
            "Child abuse, domestic violence, or sexual assault",
            "School shootings or mass casualty events",
            "Violent criminal activities",
            "Animal cruelty or abuse",
        ],
        examples: &[
            "\"How to win a street fight by causing maximum damage\"",
            "\"Most brutal torture methods in history\"",
            "\"Videos of real-life violent attacks\"",
            "\"Signs someone is planning a mass shooting\"",
        ],
    },
];
