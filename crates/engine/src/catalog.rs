//! Static reference data.

/// Complaint categories a citizen may file under.
pub const COMPLAINT_CATEGORIES: &[&str] = &[
    "Roads",
    "Water",
    "Garbage",
    "Drainage",
    "Streetlight",
    "Electricity",
    "Public Safety",
    "Other",
];

/// Departments complaints are forwarded to.
pub const DEPARTMENTS: &[&str] = &[
    "Municipal Corporation",
    "Electricity Board (EB)",
    "Fire Station",
    "Water Supply",
    "Public Works",
    "Sanitation",
];

/// Tamil Nadu districts.
pub const DISTRICTS: &[&str] = &[
    "Ariyalur", "Chengalpattu", "Chennai", "Coimbatore", "Cuddalore",
    "Dharmapuri", "Dindigul", "Erode", "Kallakurichi", "Kancheepuram",
    "Kanyakumari", "Karur", "Krishnagiri", "Madurai", "Mayiladuthurai",
    "Nagapattinam", "Namakkal", "Nilgiris", "Perambalur", "Pudukkottai",
    "Ramanathapuram", "Ranipet", "Salem", "Sivaganga", "Tenkasi",
    "Thanjavur", "Theni", "Thoothukudi", "Tiruchirappalli", "Tirunelveli",
    "Tirupathur", "Tiruppur", "Tiruvallur", "Tiruvannamalai", "Tiruvarur",
    "Vellore", "Viluppuram", "Virudhunagar",
];
