//! Fact catalog for the "Fuzzy Logic" screen
//!
//! A fixed table of short, light-hearted animal facts and a picker that draws
//! from it uniformly at random, with replacement.
//!
//! Only the six animal categories are carried. The first-person remarks in an
//! assistant's voice that closed the app's web catalog are left out: they are
//! not about animals and read as product copy.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// One entry of the catalog: a category badge and the fact itself
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fact {
    pub category: &'static str,
    pub text: &'static str,
}

/// Picks an index in `0..len`. Injected so tests can script the draws.
pub type IndexSource = Box<dyn FnMut(usize) -> usize + Send>;

/// Index source backed by an entropy-seeded `StdRng`
pub fn random_source() -> IndexSource {
    let mut rng = StdRng::from_entropy();
    Box::new(move |len| rng.gen_range(0..len))
}

/// Reproducible index source for a given seed
pub fn seeded_source(seed: u64) -> IndexSource {
    let mut rng = StdRng::seed_from_u64(seed);
    Box::new(move |len| rng.gen_range(0..len))
}

/// Index source that replays `indices` in order, cycling when exhausted
pub fn scripted_source(indices: Vec<usize>) -> IndexSource {
    let mut cursor = 0;
    Box::new(move |_len| {
        let index = indices.get(cursor % indices.len().max(1)).copied().unwrap_or(0);
        cursor += 1;
        index
    })
}

/// Holds the fact on display and the random source for the next one
pub struct FactPicker {
    current: usize,
    source: IndexSource,
}

impl FactPicker {
    pub fn new(source: IndexSource) -> Self {
        Self { current: 0, source }
    }

    /// The fact currently on display
    pub fn current(&self) -> Fact {
        FACTS[self.current]
    }

    /// Back to the first catalog entry, as on every entry into the screen
    pub fn reset(&mut self) {
        self.current = 0;
    }

    /// Draws a new fact. Repeats are allowed.
    pub fn next(&mut self) -> Fact {
        // Out-of-range scripted indices wrap rather than panic
        self.current = (self.source)(FACTS.len()) % FACTS.len();
        self.current()
    }
}

impl std::fmt::Debug for FactPicker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FactPicker")
            .field("current", &self.current)
            .finish_non_exhaustive()
    }
}

/// Every fact the picker can show
pub const FACTS: &[Fact] = &[
    Fact {
        category: "Ken Allen",
        text: "Ken Allen (the orangutan) escaped his enclosure at San Diego Zoo three times. He didn't run away; he just walked around looking at other animals like a tourist. The 'Hairy Houdini' was eventually caught because he'd wait for keepers to leave before using a crowbar he had hidden.",
    },
    Fact {
        category: "Ken Allen",
        text: "Other orangutans started copying Ken Allen's escape attempts. The zoo had to go undercover dressed as tourists to figure out how they were doing it. Ken Allen was smarter than the undercover agents.",
    },
    Fact {
        category: "Ken Allen",
        text: "The zoo tried putting female orangutans in Ken Allen's enclosure to 'distract' him from escaping. Ken was not interested. He had places to be.",
    },
    Fact {
        category: "Ken Allen",
        text: "Ken Allen became so famous that fans started a fan club. They sold t-shirts that said 'Free Ken Allen.' He was a literal celebrity.",
    },
    Fact {
        category: "Ken Allen",
        text: "Ken Allen never hurt anyone during his escapes. He just wanted to walk around and look at things. He threw a rock at a glass enclosure once, but that was it. Mostly peaceful protests.",
    },
    Fact {
        category: "Ken Allen",
        text: "Zookeepers had to hire rock climbers to find Ken's escape routes. Ken had discovered climbing holds in the walls that professional climbers called 'impressive.'",
    },
    Fact {
        category: "Ken Allen",
        text: "Ken Allen once unscrewed a metal vent cover using his fingers. When the zoo welded it shut, he found a different way out. He was always three steps ahead.",
    },
    Fact {
        category: "Ken Allen",
        text: "After one escape, Ken was found calmly sitting near a group of visitors, people-watching. He just wanted to see what was on the other side.",
    },
    Fact {
        category: "Ken Allen",
        text: "The zoo installed electric wires around Ken's enclosure. Ken tested them with a piece of wet lettuce first. When it sparked, he stopped. But he remembered.",
    },
    Fact {
        category: "Ken Allen",
        text: "Ken Allen inspired other orangutans to escape. A female named Kumang got out twice. The zoo called them 'a bad influence on each other.' Partnership goals.",
    },
    Fact {
        category: "Ken Allen",
        text: "Ken would unscrew bolts and hide them. He understood that if he left the bolts visible, humans would notice. He was planning heists.",
    },
    Fact {
        category: "Ken Allen",
        text: "One time Ken pried open a window with a stick he had hidden. When keepers found his tool stash, they discovered he'd been collecting escape supplies for months.",
    },
    Fact {
        category: "Ken Allen",
        text: "Ken Allen's escapes cost the San Diego Zoo over $40,000 in security upgrades. He was expensive to contain. Worth it.",
    },
    Fact {
        category: "Ken Allen",
        text: "There was a song written about Ken Allen called 'The Ballad of Ken Allen.' Yes, an orangutan had his own folk song. He earned it.",
    },
    Fact {
        category: "Ken Allen",
        text: "Ken Allen lived to be 29 years old. When he passed in 2000, the zoo held a memorial. Fans left flowers. He was genuinely mourned.",
    },
    Fact {
        category: "Ken Allen",
        text: "Ken was born at the San Diego Zoo in 1971. From a young age, he showed 'unusual curiosity' about his enclosure. Translation: he was casing the joint.",
    },
    Fact {
        category: "Ken Allen",
        text: "Ken Allen would watch zookeepers work and learn from them. He figured out how doors, locks, and latches worked just by observation. Student of the game.",
    },
    Fact {
        category: "Ken Allen",
        text: "When Ken escaped, he didn't run. He walked. Casually. With the confidence of someone who belonged there. Main character energy.",
    },
    Fact {
        category: "Ken Allen",
        text: "The undercover keepers dressed as tourists would watch Ken for suspicious behavior. Ken would watch them back. He knew.",
    },
    Fact {
        category: "Golden Snub-Nosed Monkey",
        text: "These monkeys have bright blue faces and practically no nose. They live in freezing mountains and cuddle in giant 'huddle piles' of 20+ monkeys for warmth. It is a giant ball of blue-faced fluff.",
    },
    Fact {
        category: "Golden Snub-Nosed Monkey",
        text: "Male golden snub-nosed monkeys will groom females for HOURS to win their affection. The females then rank males by grooming quality. Romance is a skill.",
    },
    Fact {
        category: "Golden Snub-Nosed Monkey",
        text: "These monkeys have harems, but the females are actually in charge. If a male is being annoying, the females will collectively leave him for a better one. Girl power.",
    },
    Fact {
        category: "Golden Snub-Nosed Monkey",
        text: "Baby golden snub-nosed monkeys are passed around the whole group for cuddles. Everyone gets a turn holding the baby. It takes a village (of blue-faced fluffballs).",
    },
    Fact {
        category: "Golden Snub-Nosed Monkey",
        text: "Their flat noses evolved to prevent frostbite in the snowy mountains of China. Form follows function, and the function is surviving -40°F winters.",
    },
    Fact {
        category: "Golden Snub-Nosed Monkey",
        text: "Golden snub-nosed monkeys eat lichen off trees in winter—a food source almost no other primate can digest. They are built different.",
    },
    Fact {
        category: "Golden Snub-Nosed Monkey",
        text: "Groups can have up to 600 members. Imagine 600 blue-faced golden fluffballs moving through a snowy forest together. That is real and it happens.",
    },
    Fact {
        category: "Rabbit Fact",
        text: "When a rabbit is purely happy, it performs a 'binky'—jumping into the air and twisting its body. It is biologically impossible to look at a binky and stay sad.",
    },
    Fact {
        category: "Rabbit Fact",
        text: "Rabbits purr! If you pet them and their teeth start chattering softly, that is a bunny purr. It means you are doing a good job.",
    },
    Fact {
        category: "Rabbit Fact",
        text: "Male rabbits will do a special 'courtship dance' that involves running circles around their crush and making honking noises. It's dorky and it works.",
    },
    Fact {
        category: "Rabbit Fact",
        text: "Rabbits 'chinning' things (rubbing their chin on objects) is them saying 'this is MINE.' They will chin their food, their toys, and their favorite humans.",
    },
    Fact {
        category: "Rabbit Fact",
        text: "When rabbits flop dramatically onto their side, it means they feel completely safe. A bunny flop is the ultimate compliment.",
    },
    Fact {
        category: "Rabbit Fact",
        text: "Rabbits will lick the people they love. If a rabbit licks you, congratulations—you have been chosen.",
    },
    Fact {
        category: "Rabbit Fact",
        text: "A rabbit's teeth never stop growing. They have to chew constantly to keep them filed down. This is why they destroy everything you love.",
    },
    Fact {
        category: "Rabbit Fact",
        text: "Rabbits can see almost 360 degrees around them without moving their head. You cannot sneak up on a rabbit. They saw you coming.",
    },
    Fact {
        category: "Rabbit Fact",
        text: "Rabbits can't vomit. Their digestive system only goes one way. This is why they're so picky about what they eat.",
    },
    Fact {
        category: "Rabbit Fact",
        text: "A group of rabbits is called a 'fluffle.' This is objectively the best collective noun in the English language.",
    },
    Fact {
        category: "Rabbit Fact",
        text: "Rabbits sleep with their eyes open. They are always watching. Always.",
    },
    Fact {
        category: "Rabbit Fact",
        text: "Wild rabbits live in complex underground tunnel systems called warrens, with multiple rooms for sleeping, nesting, and escaping. They are tiny architects.",
    },
    Fact {
        category: "Golden Lion Tamarin",
        text: "These tiny monkeys look like they're wearing a bright orange lion costume. They are the size of a squirrel but have the confidence of a king.",
    },
    Fact {
        category: "Golden Lion Tamarin",
        text: "Golden lion tamarins are monogamous and the dads do most of the childcare. The father carries the babies on his back everywhere. Supportive king behavior.",
    },
    Fact {
        category: "Golden Lion Tamarin",
        text: "Tamarin couples sleep curled up together in tree holes. They pick the coziest spots and spoon all night. Relationship goals.",
    },
    Fact {
        category: "Golden Lion Tamarin",
        text: "These tiny monkeys communicate with over 17 different calls. They literally have a word for 'food,' 'danger,' and probably 'that's my spot.'",
    },
    Fact {
        category: "Golden Lion Tamarin",
        text: "Golden lion tamarins were almost extinct in the 1970s with only 200 left. Conservation efforts brought them back to over 3,700. A genuine success story.",
    },
    Fact {
        category: "Golden Lion Tamarin",
        text: "Their long fingers are perfect for reaching into tree bark crevices to pull out insects and frogs. They are tiny, fluffy, extremely effective predators.",
    },
    Fact {
        category: "Golden Lion Tamarin",
        text: "Tamarins often give birth to twins. Both parents and older siblings help raise them. The whole family pitches in.",
    },
    Fact {
        category: "Golden Lion Tamarin",
        text: "They weigh about as much as a stick of butter (about 620 grams) but have manes that make them look twice their size. All fluff, maximum drama.",
    },
    Fact {
        category: "Gibbon Fact",
        text: "Gibbons are the opera singers of the primate world. They sing duets with their partners every morning to mark their territory. It's loud, chaotic, and very romantic.",
    },
    Fact {
        category: "Gibbon Fact",
        text: "Gibbon couples develop their own unique duet over years together. Their song literally evolves as their relationship deepens. A love language.",
    },
    Fact {
        category: "Gibbon Fact",
        text: "Gibbons mate for life and get genuinely depressed if separated from their partner. They are the hopeless romantics of the primate world.",
    },
    Fact {
        category: "Gibbon Fact",
        text: "A gibbon's arm span is longer than its body. They swing through trees at up to 35 mph. They are basically furry acrobats showing off for each other.",
    },
    Fact {
        category: "Gibbon Fact",
        text: "Male gibbons help raise babies, groom their partners, and share food. The bar is on the forest floor and gibbons are in the trees clearing it.",
    },
    Fact {
        category: "Gibbon Fact",
        text: "Gibbons are technically apes, not monkeys. They have no tail. They are very sensitive about this distinction.",
    },
    Fact {
        category: "Gibbon Fact",
        text: "A gibbon can leap up to 50 feet between trees. They spend almost their entire lives in the canopy and rarely touch the ground.",
    },
    Fact {
        category: "Gibbon Fact",
        text: "Their songs can be heard from over a mile away. Each species has a different song. The forest is basically a gibbon concert hall.",
    },
    Fact {
        category: "Gibbon Fact",
        text: "Gibbons have the longest arms relative to body size of any primate. When they walk on the ground, they hold their arms up for balance. It looks hilarious.",
    },
    Fact {
        category: "Gibbon Fact",
        text: "Baby gibbons cling to their mother's belly for the first few months, then ride on her back like a tiny backpack. Gibbon moms are strong.",
    },
    Fact {
        category: "Capuchin Fact",
        text: "Capuchin monkeys use tools, plan for the future, and hold grudges. They will remember if you wronged them. Respect the capuchin.",
    },
    Fact {
        category: "Capuchin Fact",
        text: "Female capuchins flirt by raising their eyebrows, pouting, and running away to see if the male follows. The original 'playing hard to get.'",
    },
    Fact {
        category: "Capuchin Fact",
        text: "Capuchins have been observed testing their partners by starting fights and seeing who stands up for them. They literally test loyalty. Chaotic.",
    },
    Fact {
        category: "Capuchin Fact",
        text: "Capuchin monkeys will share food with their friends but demand fairness. In experiments, they reject treats if another monkey got a better one. They invented 'that's not fair.'",
    },
    Fact {
        category: "Capuchin Fact",
        text: "Male capuchins do a 'dance' to impress females that involves weird facial expressions and swaying. It looks ridiculous. The females love it.",
    },
    Fact {
        category: "Capuchin Fact",
        text: "Capuchins rub onions and citrus on their fur as 'perfume' and insect repellent. They invented self-care routines millions of years before us.",
    },
    Fact {
        category: "Capuchin Fact",
        text: "Capuchins are named after Capuchin monks because their fur pattern looks like a monk's hood. The monks were not consulted about this.",
    },
    Fact {
        category: "Capuchin Fact",
        text: "They use rocks to crack open nuts, and will carry their favorite rock around for years. They get attached to their tools.",
    },
    Fact {
        category: "Capuchin Fact",
        text: "Capuchins have been taught to use money. In experiments, they traded tokens for food and even showed economic behaviors like bargain-hunting.",
    },
    Fact {
        category: "Capuchin Fact",
        text: "They are one of the smartest New World monkeys and can solve complex puzzles that stump other primates. Never underestimate a capuchin.",
    },
    Fact {
        category: "Capuchin Fact",
        text: "Capuchins wash their hands and feet in their own urine, possibly to mark territory or cool down. Weird flex but okay.",
    },
    Fact {
        category: "Capuchin Fact",
        text: "A capuchin's brain is about the size of a lemon, but relative to their body size, it's one of the largest among primates. Big brain energy.",
    },
];

/// Distinct category labels, in catalog order
pub fn categories() -> Vec<&'static str> {
    let mut seen = Vec::new();
    for fact in FACTS {
        if !seen.contains(&fact.category) {
            seen.push(fact.category);
        }
    }
    seen
}
