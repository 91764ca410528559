/// Fixed table of space facts served by `/api/facts`
pub const SPACE_FACTS: &[&str] = &[
    "The Sun is so large that about 1.3 million Earths could fit inside it.",
    "A day on Venus is longer than its year. Venus rotates very slowly, taking 243 Earth days to complete one rotation.",
    "Neutron stars are so dense that a teaspoon of neutron star material would weigh about 6 billion tons on Earth.",
    "The largest volcano in the solar system is Olympus Mons on Mars, which is about 13.6 miles (22 km) high.",
    "Jupiter's Great Red Spot is a storm that has been raging for at least 350 years and is larger than Earth.",
    "Saturn's moon Titan has lakes and rivers made of liquid methane and ethane instead of water.",
    "The International Space Station travels at about 17,500 mph (28,000 km/h) and orbits Earth every 90 minutes.",
    "One million Earths could fit inside the Sun, and the Sun is considered an average-sized star.",
    "The footprints left by Apollo astronauts on the Moon will likely last for millions of years due to the lack of atmosphere.",
    "The coldest place in the universe that we know of is the Boomerang Nebula, where temperatures drop to -458°F (-272°C).",
    "Betelgeuse is so large that if it replaced our Sun, it would extend beyond the orbit of Mars.",
    "The Milky Way galaxy contains an estimated 100-400 billion stars and is about 100,000 light-years across.",
    "A black hole's gravity is so strong that not even light can escape from it once it crosses the event horizon.",
    "The universe is expanding at an accelerating rate, driven by mysterious dark energy.",
    "Proxima Centauri is the closest star to our Sun, located about 4.24 light-years away.",
    "The asteroid belt between Mars and Jupiter contains millions of asteroids, but their total mass is less than Earth's Moon.",
    "Uranus rotates on its side, with an axial tilt of about 98 degrees, possibly due to a collision with an Earth-sized object.",
    "The speed of light in a vacuum is exactly 299,792,458 meters per second (186,282 miles per second).",
    "Europa, one of Jupiter's moons, likely has twice as much water as all of Earth's oceans combined, beneath its icy surface.",
    "The temperature at the core of the Sun is about 15 million degrees Celsius (27 million degrees Fahrenheit).",
];

/// Uniform draw from `facts`; `None` only for an empty table
pub fn pick_random<'a>(facts: &[&'a str]) -> Option<&'a str> {
    if facts.is_empty() {
        return None;
    }
    Some(facts[rand::random_range(0..facts.len())])
}
